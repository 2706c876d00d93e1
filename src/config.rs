use crate::error::{Result, SekisanError};
use sekisan_common::{RateCatalog, DEFAULT_BASE_SET_ID};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データフォルダを上書きする環境変数
pub const DATA_DIR_ENV: &str = "SEKISAN_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 保存先フォルダ（未設定ならOS既定のデータフォルダ）
    pub data_dir: Option<PathBuf>,
    /// 新規見積で使う公表単価セット
    pub default_base_set_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_base_set_id: DEFAULT_BASE_SET_ID.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SekisanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sekisan").join("config.json"))
    }

    /// 保存先の決定: 引数 > 環境変数 > 設定ファイル > OS既定
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|d| d.join("sekisan"))
            .ok_or_else(|| SekisanError::Config("データフォルダが見つかりません".into()))
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = Some(dir);
        self.save()
    }

    /// 新規見積の既定単価セットを変更（カタログに無いIDは拒否、保存は呼び出し側）
    pub fn set_default_base_set(&mut self, catalog: &RateCatalog, id: &str) -> Result<()> {
        catalog.get(id)?;
        self.default_base_set_id = id.to_string();
        Ok(())
    }
}
