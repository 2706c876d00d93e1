use anyhow::Context;
use clap::Parser;
use dialoguer::Confirm;
use sekisan::{cli, config, estimates, rate_sets, report, store};
use sekisan_common::picker::{filter_rate_items, filter_work_type_templates};
use sekisan_common::{format_yen, OverheadUnit, RateCatalog, RateSetData, RateSetRef};

use cli::{
    CatalogCommand, Cli, Commands, EstimateCommand, LineCommand, OverheadAction, RateSetCommand,
    WorkTypeCommand,
};
use config::Config;
use estimates::EstimateRepository;
use rate_sets::RateSetRepository;
use store::Storage;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ {:#}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn run_config(
    config: &mut Config,
    data_dir_flag: Option<&std::path::Path>,
    set_data_dir: Option<std::path::PathBuf>,
    set_default_base: Option<String>,
    show: bool,
) -> anyhow::Result<()> {
    let edited = set_data_dir.is_some() || set_default_base.is_some();

    if let Some(dir) = set_data_dir {
        config.set_data_dir(dir)?;
        if let Some(dir) = &config.data_dir {
            println!("✔ データフォルダを設定しました: {}", dir.display());
        }
    }

    if let Some(base) = set_default_base {
        config.set_default_base_set(RateCatalog::builtin(), &base)?;
        config.save()?;
        println!("✔ 既定の単価セットを設定しました: {}", base);
    }

    if show || !edited {
        let data_dir = config.resolve_data_dir(data_dir_flag)?;
        println!("設定:");
        println!("  設定ファイル: {}", Config::config_path()?.display());
        println!("  データフォルダ: {}", data_dir.display());
        println!("  既定の単価セット: {}", config.default_base_set_id);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let command = match cli.command {
        Commands::Config { set_data_dir, set_default_base, show } => {
            return run_config(&mut config, cli.data_dir.as_deref(), set_data_dir, set_default_base, show);
        }
        other => other,
    };

    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let storage = Storage::open_json(&data_dir)
        .await
        .with_context(|| format!("データフォルダを開けません: {}", data_dir.display()))?;

    let catalog = RateCatalog::builtin();
    let rate_sets = RateSetRepository::new(catalog, &storage);
    let estimates = EstimateRepository::new(&storage);

    match command {
        Commands::Catalog(cmd) => run_catalog(catalog, cmd)?,
        Commands::RateSet(cmd) => run_rate_set(&rate_sets, cmd).await?,
        Commands::Estimate(cmd) => run_estimate(&config, &rate_sets, &estimates, cmd).await?,
        Commands::WorkType(cmd) => run_work_type(&estimates, cmd).await?,
        Commands::Line(cmd) => run_line(&rate_sets, &estimates, cmd).await?,

        Commands::Items { estimate, category, query } => {
            let est = estimates.get(&estimate).await?;
            let rates = rate_sets.resolve_for_estimate(&est).await?;
            let items = filter_rate_items(&rates, category, &query);

            println!("{}（{}）表示件数: {}", category.label(), est.rate_set_ref, items.len());
            if items.is_empty() {
                println!("  （該当なし）");
            }
            for (key, item) in items {
                println!(
                    "  {:<12} {} / {} / {} 円",
                    key,
                    item.name,
                    item.unit.label(),
                    item.unit_price_yen
                );
            }
        }

        Commands::Overhead { estimate, action } => {
            let (est, _) = estimates
                .update(&estimate, |est| {
                    match action {
                        OverheadAction::Mode { mode } => est.set_overhead_mode(mode),
                        OverheadAction::Rate { rate } => est.set_overhead_rate(rate),
                        OverheadAction::Yen { yen } => est.set_overhead_yen(yen),
                    }
                    Ok(())
                })
                .await?;
            let totals = sekisan_common::compute_totals(&est);
            println!("✔ 諸経費: {}", report::describe_overhead(&est.overhead));
            println!("  諸経費額: {} 円 / 見積総額: {} 円", format_yen(totals.overhead), format_yen(totals.grand_total));
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_rate_set_data(data: &RateSetData) {
    for category in sekisan_common::RateCategory::ALL {
        println!("  [{}]", category.label());
        for (key, item) in data.items(category) {
            println!(
                "    {:<12} {} / {} / {} 円",
                key,
                item.name,
                item.unit.label(),
                item.unit_price_yen
            );
        }
    }
    println!("  [諸経費]");
    for (key, item) in &data.overhead {
        let value = match item.unit {
            OverheadUnit::Rate => format!("率 {}", item.value),
            OverheadUnit::Yen => format!("{} 円", item.value),
        };
        println!("    {:<20} {} / {}", key, item.name, value);
    }
}

fn run_catalog(catalog: &RateCatalog, cmd: CatalogCommand) -> anyhow::Result<()> {
    match cmd {
        CatalogCommand::List => {
            println!("公表単価セット（{}件）:", catalog.len());
            for entry in catalog.list() {
                println!("  {:<14} {}", entry.id, entry.label);
            }
        }
        CatalogCommand::Show { id } => {
            let base = catalog.get(&id)?;
            println!("公表: {} ({})", base.label, base.id);
            print_rate_set_data(&base.data);
        }
    }
    Ok(())
}

async fn run_rate_set(rate_sets: &RateSetRepository<'_>, cmd: RateSetCommand) -> anyhow::Result<()> {
    match cmd {
        RateSetCommand::Create { base, name } => {
            let base_id = base.unwrap_or_else(|| sekisan_common::DEFAULT_BASE_SET_ID.to_string());
            let rs = rate_sets.create_from_base(&base_id, &name).await?;
            println!("✔ 作成した: {} ({})", rs.name, rs.id);
        }

        RateSetCommand::List => {
            let items = rate_sets.list().await?;
            if items.is_empty() {
                println!("カスタム単価セットはまだない");
            }
            for rs in items {
                let origin = if rate_sets.catalog().contains(&rs.origin_base_set_id) {
                    rs.origin_base_set_id.clone()
                } else {
                    format!("{}（公表一覧に無し）", rs.origin_base_set_id)
                };
                println!("  {}  {}  元: {}  更新: {}", rs.id, rs.name, origin, rs.updated_at);
            }
        }

        RateSetCommand::Show { id } => {
            let rs = rate_sets.get(&id).await?;
            println!("カスタム: {} ({})", rs.name, rs.id);
            println!("  元: {}", rs.origin_base_set_id);
            print_rate_set_data(&rs.data);
        }

        RateSetCommand::Rename { id, name } => {
            let rs = rate_sets
                .update(&id, |rs| {
                    rs.name = name;
                    Ok(())
                })
                .await?;
            println!("✔ 保存した: {}", rs.name);
        }

        RateSetCommand::SetPrice { id, category, key, unit_price_yen } => {
            rate_sets
                .update(&id, |rs| rs.data.set_unit_price(category, &key, unit_price_yen))
                .await?;
            println!("✔ 保存した: {}/{} = {} 円", category.code(), key, unit_price_yen);
        }

        RateSetCommand::SetMeta { id, category, key, name, unit } => {
            rate_sets
                .update(&id, |rs| rs.data.update_item_meta(category, &key, name.as_deref(), unit))
                .await?;
            println!("✔ 保存した: {}/{}", category.code(), key);
        }

        RateSetCommand::AddItem { id, category, code, name, unit, unit_price_yen } => {
            rate_sets
                .update(&id, |rs| rs.data.add_item(category, &code, &name, unit, unit_price_yen))
                .await?;
            println!("✔ 追加した: {}/{}", category.code(), code.trim());
        }

        RateSetCommand::RemoveItem { id, category, key } => {
            rate_sets
                .update(&id, |rs| rs.data.remove_item(category, &key).map(|_| ()))
                .await?;
            println!("✔ 削除した: {}/{}", category.code(), key);
        }

        RateSetCommand::SetOverhead { id, key, value } => {
            rate_sets
                .update(&id, |rs| rs.data.set_overhead_value(&key, value))
                .await?;
            println!("✔ 保存した: {} = {}", key, value);
        }

        RateSetCommand::Delete { id, yes } => {
            let rs = rate_sets.get(&id).await?;
            if !confirm(&format!("カスタム単価セット「{}」を削除する？", rs.name), yes)? {
                println!("キャンセルした");
                return Ok(());
            }
            rate_sets.delete(&id).await?;
            println!("✔ 削除した: {}", rs.name);
        }
    }
    Ok(())
}

async fn run_estimate(
    config: &Config,
    rate_sets: &RateSetRepository<'_>,
    estimates: &EstimateRepository,
    cmd: EstimateCommand,
) -> anyhow::Result<()> {
    match cmd {
        EstimateCommand::New { base } => {
            let base_id = base.unwrap_or_else(|| config.default_base_set_id.clone());
            rate_sets.catalog().get(&base_id)?;
            let est = estimates.create(RateSetRef::base(base_id)).await?;
            println!("✔ 作成した: {} ({})", est.name, est.id);
        }

        EstimateCommand::List => {
            let items = estimates.list().await?;
            if items.is_empty() {
                println!("見積はまだない");
            }
            for est in items {
                let totals = sekisan_common::compute_totals(&est);
                println!(
                    "  {}  {}  {}  総額 {} 円  更新: {}",
                    est.id,
                    est.name,
                    est.rate_set_ref,
                    format_yen(totals.grand_total),
                    est.updated_at
                );
            }
        }

        EstimateCommand::Show { id } => {
            let est = estimates.get(&id).await?;
            print!("{}", report::render_estimate(&est));

            match rate_sets.resolve_for_estimate(&est).await {
                Ok(_) => {}
                Err(e) if e.is_stale_reference() => {
                    println!("\n⚠ {}", e);
                    println!("  `sekisan estimate switch` で単価セットを選び直してください（明細と集計はそのまま編集できる）");
                }
                Err(e) => return Err(e.into()),
            }
        }

        EstimateCommand::Rename { id, name } => {
            let (est, _) = estimates
                .update(&id, |est| {
                    est.rename(&name);
                    Ok(())
                })
                .await?;
            println!("✔ 保存した: {}", est.name);
        }

        EstimateCommand::Switch { id, rate_set } => {
            let outcome = estimates.switch_rate_set(rate_sets, &id, rate_set).await?;
            let totals = sekisan_common::compute_totals(&outcome.estimate);
            println!("✔ 単価セットを切替: {}", outcome.estimate.rate_set_ref);
            println!("  {}", report::describe_refresh(&outcome.report));
            println!("  見積総額: {} 円", format_yen(totals.grand_total));
        }

        EstimateCommand::Delete { id, yes } => {
            let est = estimates.get(&id).await?;
            if !confirm(&format!("見積「{}」を削除する？", est.name), yes)? {
                println!("キャンセルした");
                return Ok(());
            }
            estimates.delete(&id).await?;
            println!("✔ 削除した: {}", est.name);
        }
    }
    Ok(())
}

async fn run_work_type(estimates: &EstimateRepository, cmd: WorkTypeCommand) -> anyhow::Result<()> {
    match cmd {
        WorkTypeCommand::Add { estimate, name } => {
            let id = sekisan::stamp::new_id();
            let (_, wt) = estimates
                .update(&estimate, |est| est.add_work_type(id, &name).cloned())
                .await?;
            println!("✔ 工種を追加: {} ({})", wt.name, wt.id);
        }

        WorkTypeCommand::Remove { estimate, work_type, yes } => {
            let est = estimates.get(&estimate).await?;
            let name = est
                .work_type(&work_type)
                .map(|w| w.name.clone())
                .ok_or_else(|| sekisan_common::Error::not_found("工種", work_type.as_str()))?;
            if !confirm(&format!("工種「{}」を削除する？（中の明細も消える）", name), yes)? {
                println!("キャンセルした");
                return Ok(());
            }
            let (_, removed) = estimates
                .update(&estimate, |est| est.delete_work_type(&work_type))
                .await?;
            println!("✔ 工種を削除: {}（明細 {}行）", name, removed);
        }

        WorkTypeCommand::Templates { query } => {
            let names = filter_work_type_templates(&query);
            if names.is_empty() {
                println!("（該当なし）");
            }
            for name in names {
                println!("  {}", name);
            }
        }
    }
    Ok(())
}

async fn run_line(
    rate_sets: &RateSetRepository<'_>,
    estimates: &EstimateRepository,
    cmd: LineCommand,
) -> anyhow::Result<()> {
    match cmd {
        LineCommand::Add { estimate, work_type, category, key, qty } => {
            let line = estimates
                .add_line(rate_sets, &estimate, &work_type, category, &key, qty)
                .await?;
            println!(
                "✔ 明細を追加: {} {} {} × {} 円 ({})",
                line.name,
                line.qty,
                line.unit.label(),
                line.unit_price_yen,
                line.id
            );
        }

        LineCommand::Qty { estimate, line, qty } => {
            estimates
                .update(&estimate, |est| est.set_line_qty(&line, qty))
                .await?;
            println!("✔ 数量を変更: {}", qty);
        }

        LineCommand::Price { estimate, line, unit_price_yen } => {
            estimates
                .update(&estimate, |est| est.override_line_price(&line, unit_price_yen))
                .await?;
            println!("✔ 単価を上書き: {} 円（単価セット切替で更新されません）", unit_price_yen);
        }

        LineCommand::Remove { estimate, line } => {
            let (_, removed) = estimates
                .update(&estimate, |est| est.delete_line(&line))
                .await?;
            println!("✔ 明細を削除: {}", removed.name);
        }
    }
    Ok(())
}
