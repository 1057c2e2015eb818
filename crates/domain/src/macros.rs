/// データサービスの整数主キーをラップする ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`i64` をラップ）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `new()`: 既存の値から作成
///
/// ID の採番はデータサービス側で行うため、このプロセスで新規生成する手段は持たない。
///
/// # 使用例
///
/// ```rust
/// use timewise_domain::reminder::ReminderId;
///
/// let id = ReminderId::new(42);
/// assert_eq!(id.to_string(), "42");
/// ```
macro_rules! define_record_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(i64);

        impl $Name {
            /// 既存の値から ID を作成する
            pub fn new(value: i64) -> Self {
                Self(value)
            }
        }
    };
}
