/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: access gate (route 分類 → session → role)
 * - http: request id / tracing / body limit / timeout
 */
pub mod auth;
pub mod http;
