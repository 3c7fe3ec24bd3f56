use anyhow::{Result, bail};
use clap::Args;
use console_core::list::{FilterKey, FilterState, ListSnapshot, LoadStatus, SortDirection, SortState};
use console_core::record::{EntityKind, Record};

use super::print_notifications;
use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// modules, organizations or templates
    pub entity: EntityKind,
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
    /// Status filter (active, inactive, approved, ...); "all" for none
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Created on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Created on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Additional filter, e.g. `--filter country=India`
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,
    /// Sort column
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u64,
    #[arg(long)]
    pub page_size: Option<u64>,
    /// Print the full screen state as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

pub async fn run(ctx: &AppContext, args: ListArgs) -> Result<()> {
    if args.page == 0 {
        bail!("--page starts at 1");
    }
    let vm = ctx.list_view_model(args.entity, args.page_size)?;

    let mut filters = FilterState::defaults_for(vm.schema());
    let fixed = [
        (FilterKey::Search, args.search),
        (FilterKey::Status, args.status),
        (FilterKey::Category, args.category),
        (FilterKey::DateFrom, args.from),
        (FilterKey::DateTo, args.to),
    ];
    for (key, value) in fixed {
        if let Some(value) = value {
            filters.set(key, value);
        }
    }
    for (key, value) in args.filters {
        let key = FilterKey::from(key.as_str());
        key.check()?;
        filters.set(key, value);
    }
    if let Some(field) = args.sort {
        filters.sort = SortState {
            field,
            direction: if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        };
    } else if args.desc {
        filters.sort.direction = SortDirection::Descending;
    }

    vm.restore(filters, args.page - 1).await?;
    print_notifications(&vm.take_notifications().await);

    let snapshot = vm.snapshot().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_table(args.entity, &snapshot);
    }

    if snapshot.status == LoadStatus::Error {
        bail!("Failed to load {}s", args.entity);
    }
    Ok(())
}

fn columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Module => &["name", "category"],
        EntityKind::Organization => &["name", "email", "country", "city"],
        EntityKind::Template => &["name", "category", "language"],
    }
}

fn cell(record: &Record, column: &str) -> String {
    record
        .field(column)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

fn print_table(kind: EntityKind, snapshot: &ListSnapshot) {
    let columns = columns(kind);
    let mut rows: Vec<Vec<String>> = vec![
        ["ID", "STATUS"]
            .iter()
            .map(|s| s.to_string())
            .chain(columns.iter().map(|c| c.to_uppercase()))
            .collect(),
    ];
    for record in &snapshot.records {
        let mut row = vec![record.id.clone(), record.status.filter_value()];
        row.extend(columns.iter().map(|c| cell(record, c)));
        rows.push(row);
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|i| rows.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }

    let p = &snapshot.pagination;
    println!(
        "\nPage {} of {} ({} {}s, sorted by {} {})",
        p.wire_page(),
        p.total_pages.max(1),
        p.total,
        kind,
        snapshot.filters.sort.field,
        snapshot.filters.sort.direction
    );
    if let Some(summary) = &snapshot.summary {
        println!("Summary: {summary}");
    }
}
