/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - access gate が解決して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - session/role の判定ロジックは middleware/services 側の責務
 */

use crate::services::identity::{CurrentUser, Session};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user` は identity provider が返した現在のユーザー
/// - `session` は projects API を呼ぶときの bearer token として使う
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user: CurrentUser,
    pub session: Session,
}

impl AuthCtx {
    pub fn new(user: CurrentUser, session: Session) -> Self {
        Self { user, session }
    }

    pub fn access_token(&self) -> &str {
        &self.session.access_token
    }
}
