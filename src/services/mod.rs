/*
 * Responsibility
 * - 外部サービスとのやり取り (identity provider / projects API / upstream proxy)
 * - cookie consent の保存形式
 */
pub mod api_client;
pub mod consent;
pub mod identity;
pub mod proxy;
