use thiserror::Error;

#[derive(Error, Debug)]
pub enum SekisanError {
    #[error(transparent)]
    Common(#[from] sekisan_common::Error),

    #[error("保存データの読み書きに失敗: {0}")]
    Storage(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl SekisanError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SekisanError::Common(e) if e.is_not_found())
    }

    pub fn is_stale_reference(&self) -> bool {
        matches!(self, SekisanError::Common(sekisan_common::Error::StaleReference(_)))
    }
}

pub type Result<T> = std::result::Result<T, SekisanError>;
