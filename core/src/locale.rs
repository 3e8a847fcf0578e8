//! User-facing strings. The console ships in Japanese only.

/// Fallback when a failed response carries no usable message.
pub const GENERIC_ERROR: &str = "エラーが発生しました";
/// Shown when a request was sent but no response arrived.
pub const NETWORK_ERROR: &str = "ネットワークエラー: インターネット接続を確認してください";

pub const CUSTOMERS_FAILED: &str = "顧客一覧の取得に失敗しました。";
pub const CUSTOMERS_EMPTY: &str = "顧客データがまだ登録されていません。";
pub const CUSTOMER_FAILED: &str = "顧客情報の取得に失敗しました。";
pub const ORDERS_FAILED: &str = "注文履歴の取得に失敗しました。";
pub const ORDERS_EMPTY: &str = "この顧客の注文履歴はまだありません。";
pub const DIAGNOSES_FAILED: &str = "診断一覧の取得に失敗しました。";
pub const DIAGNOSES_EMPTY: &str = "診断データがまだ登録されていません。";
pub const APPOINTMENTS_FAILED: &str = "予約一覧の取得に失敗しました。";
pub const APPOINTMENTS_EMPTY: &str = "予約データがまだ登録されていません。";

pub const ORDER_CREATE_FAILED: &str = "発注作成に失敗しました。";
pub const DOCUMENT_FAILED: &str = "発注書PDFの生成に失敗しました。";

// Order form validation messages.
pub const MISSING_FABRIC_ID: &str = "生地IDは必須です";
pub const INVALID_AMOUNT: &str = "金額は1円以上の数値を入力してください";
pub const MISSING_DELIVERY_DATE: &str = "納期を選択してください";
pub const MALFORMED_DELIVERY_DATE: &str = "納期の形式が不正です";
pub const EMPTY_DESCRIPTION: &str = "給付の内容を入力してください";

/// Helper text under an empty fabric id.
pub const FABRIC_ID_HINT: &str = MISSING_FABRIC_ID;
/// Helper text under an unusable amount.
pub const AMOUNT_HINT: &str = "金額は1円以上を入力してください";

/// Pre-filled description of a new order.
pub const DEFAULT_ORDER_DESCRIPTION: &str = "オーダースーツ縫製";
