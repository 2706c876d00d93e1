//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind}が見つかりません: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("参照中のカスタム単価セットが削除されています: {0}")]
    StaleReference(String),

    #[error("入力値が不正: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound { kind, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
