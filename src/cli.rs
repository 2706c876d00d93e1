use clap::{Parser, Subcommand};
use sekisan_common::{OverheadKind, RateCategory, RateSetRef, RateUnit};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sekisan")]
#[command(about = "測量・工事の積算（見積）ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データフォルダ（設定ファイルより優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 公表単価セット
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// カスタム単価セット
    #[command(subcommand)]
    RateSet(RateSetCommand),

    /// 見積
    #[command(subcommand)]
    Estimate(EstimateCommand),

    /// 工種
    #[command(subcommand)]
    WorkType(WorkTypeCommand),

    /// 明細
    #[command(subcommand)]
    Line(LineCommand),

    /// 見積の単価セットから追加できる項目を表示
    Items {
        /// 見積ID
        estimate: String,

        /// 区分 (labor/equipment/consumables)
        category: RateCategory,

        /// 検索（空なら全件）
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// 諸経費
    Overhead {
        /// 見積ID
        estimate: String,

        #[command(subcommand)]
        action: OverheadAction,
    },

    /// 設定を表示/編集
    Config {
        /// データフォルダを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 新規見積の既定単価セットを設定
        #[arg(long)]
        set_default_base: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// 一覧
    List,

    /// 単価を表示
    Show {
        /// 公表単価セットID（例: MLIT-2026）
        id: String,
    },
}

#[derive(Subcommand)]
pub enum RateSetCommand {
    /// 公表単価セットをコピーして作成
    Create {
        /// コピー元の公表単価セットID
        #[arg(short, long)]
        base: Option<String>,

        /// 名前（省略時は「カスタム単価（作成日）」）
        #[arg(short, long, default_value = "")]
        name: String,
    },

    /// 一覧（更新日時の新しい順）
    List,

    /// 単価を表示
    Show { id: String },

    /// 名前を変更
    Rename { id: String, name: String },

    /// 単価を変更
    SetPrice {
        id: String,
        category: RateCategory,
        key: String,

        #[arg(allow_negative_numbers = true)]
        unit_price_yen: f64,
    },

    /// 名称・単位を変更
    SetMeta {
        id: String,
        category: RateCategory,
        key: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        unit: Option<RateUnit>,
    },

    /// 項目を追加
    AddItem {
        id: String,
        category: RateCategory,
        code: String,
        name: String,
        unit: RateUnit,
        unit_price_yen: f64,
    },

    /// 項目を削除
    RemoveItem {
        id: String,
        category: RateCategory,
        key: String,
    },

    /// 諸経費項目の値を変更
    SetOverhead {
        id: String,
        key: String,

        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// 削除
    Delete {
        id: String,

        /// 確認しない
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum EstimateCommand {
    /// 新規見積
    New {
        /// 公表単価セットID（省略時は設定の既定値）
        #[arg(short, long)]
        base: Option<String>,
    },

    /// 一覧（更新日時の新しい順）
    List,

    /// 内訳と集計を表示
    Show { id: String },

    /// 見積名を変更
    Rename { id: String, name: String },

    /// 単価セットを切替（上書きしていない明細の単価を更新）
    Switch {
        id: String,

        /// base:<ID> または custom:<ID>
        rate_set: RateSetRef,
    },

    /// 削除
    Delete {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum WorkTypeCommand {
    /// 工種を追加
    Add { estimate: String, name: String },

    /// 工種を削除（中の明細も削除）
    Remove {
        estimate: String,
        work_type: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// 工種テンプレート
    Templates {
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

#[derive(Subcommand)]
pub enum LineCommand {
    /// 単価セットの項目を明細に追加
    Add {
        estimate: String,
        work_type: String,
        category: RateCategory,
        key: String,

        /// 数量
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        qty: f64,
    },

    /// 数量を変更
    Qty {
        estimate: String,
        line: String,

        #[arg(allow_negative_numbers = true)]
        qty: f64,
    },

    /// 単価を上書き（以後、単価セット切替で更新されない）
    Price {
        estimate: String,
        line: String,

        #[arg(allow_negative_numbers = true)]
        unit_price_yen: f64,
    },

    /// 明細を削除
    Remove { estimate: String, line: String },
}

#[derive(Subcommand)]
pub enum OverheadAction {
    /// 計上方法を切替（値は0に戻る）
    Mode { mode: OverheadKind },

    /// 率で計上（例: 0.25 = 25%）
    Rate {
        #[arg(allow_negative_numbers = true)]
        rate: f64,
    },

    /// 定額で計上（円）
    Yen {
        #[arg(allow_negative_numbers = true)]
        yen: f64,
    },
}
