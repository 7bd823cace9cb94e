mod paths;

use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use datagrid::prelude::*;
use datagrid::sticky::StickyPlan;
use datagrid_lib::cache::{CacheConfig, InMemoryCache};
use datagrid_lib::error::OptionsError;
use datagrid_lib::options::{AsyncOptions, loader};
use datagrid_lib::query::filter::ColumnFilter;
use simplelog::{Config, LevelFilter, WriteLogger};

const TABLE_CONFIG: &str = r#"{ "rowsPerPage": 5, "accordion": true }"#;
const VIEWPORT: Rect = Rect::from_size(420, 400);

fn init_logging() -> Result<PathBuf, Box<dyn Error>> {
    paths::rotate_logs();
    let path = paths::log_file();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(&path)?)?;
    Ok(path)
}

fn payments() -> Vec<Row> {
    [
        (1, "Contoso", "Paid", 1200.0, 12.0, "2024-01-05"),
        (2, "Fabrikam", "Due", 80.5, 1.5, "2024-02-10"),
        (3, "Northwind", "Paid", 300.0, 3.0, "2024-02-11"),
        (4, "Tailspin", "Overdue", 15.0, 0.5, "2024-03-01"),
        (5, "Litware", "Paid", 80.5, 1.5, "2024-03-15"),
        (6, "Adventure Works", "Due", 42.0, 0.5, "2024-04-20"),
        (7, "Woodgrove", "Paid", 999.0, 9.0, "2024-05-02"),
        (8, "Proseware", "Due", 410.0, 4.0, "2024-05-19"),
        (9, "Wingtip", "Overdue", 65.0, 1.0, "2024-06-07"),
    ]
    .into_iter()
    .map(|(id, customer, status, amount, fee, date)| {
        Row::new()
            .set("id", id)
            .set("customer", customer)
            .set("status", status)
            .set("amount", amount)
            .set("fee", fee)
            .set("date", date)
    })
    .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").width(50u32).sticky(StickySide::Left),
        Column::new("customer", "Customer").width(160u32).sortable(),
        Column::new("status", "Status").width(90u32).sortable(),
        Column::new("date", "Date").width(110u32).sortable(),
        Column::group(
            "Amounts",
            vec![
                Column::new("amount", "Amount").width(90u32).sortable(),
                Column::new("fee", "Fee").width(60u32),
            ],
        )
        .sticky(StickySide::Right),
    ]
}

fn totals(rows: &[Row]) -> Row {
    let sum = |field: &str| -> f64 {
        rows.iter()
            .map(|r| r.get_nested(field).to_number())
            .filter(|n| !n.is_nan())
            .sum()
    };
    Row::new()
        .set("id", "Total")
        .set("amount", sum("amount"))
        .set("fee", sum("fee"))
}

fn print_page(grid: &DataGrid) {
    let table = grid.table();
    let range = table.record_range();
    println!(
        "Page {}/{} showing {}-{} of {}",
        table.page(),
        table.total_pages(),
        range.start,
        range.end,
        table.total_records()
    );
    for row in table.paginated_rows() {
        let cell = |field: &str| row.row.get_nested(field).to_display_string();
        println!(
            "  {:>3} {:<16} {:<8} {:>8}{}",
            cell("id"),
            cell("customer"),
            cell("status"),
            cell("amount"),
            if row.expanded { "  (expanded)" } else { "" }
        );
    }
}

fn print_sticky(plan: &StickyPlan) {
    for column in plan.left.iter().chain(plan.right.iter()) {
        println!(
            "  {:?} column {} ({}) offset {}px width {}px",
            column.side,
            column.index,
            column.field.as_deref().unwrap_or("utility"),
            column.offset,
            column.width
        );
    }
    println!("  {} pinned cells", plan.placements.len());
}

async fn load_statuses(cache: Arc<InMemoryCache>) -> Vec<String> {
    let options = AsyncOptions::with_cache(cache)
        .with_config(CacheConfig::new().with_ttl(Duration::from_secs(300)))
        .with_cache_key("status")
        .with_loader(loader(|| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, OptionsError>(vec![
                "Paid".to_string(),
                "Due".to_string(),
                "Overdue".to_string(),
            ])
        }));
    options.load(false).await
}

async fn run() -> Result<(), Box<dyn Error>> {
    let log_path = init_logging()?;
    log::info!("datagrid demo starting, logging to {}", log_path.display());

    let config = TableConfig::from_json(TABLE_CONFIG)?;
    let rows = payments();
    let footer = totals(&rows);
    let table = DataTable::new(columns(), rows).with_config(config);
    for problem in table.validate() {
        log::warn!("column config: {problem}");
    }

    let cache = Arc::new(InMemoryCache::new());
    let statuses = load_statuses(cache.clone()).await;
    println!("Status filter choices: {}", statuses.join(", "));
    // Second load is served from the cache
    load_statuses(cache.clone()).await;
    log::debug!("options cache holds {} lists", cache.len());

    let options = GridOptions::default()
        .selectable()
        .expandable()
        .with_footer(footer)
        .with_detail(|row| {
            format!("Invoice for {}", row.get_nested("customer").to_display_string())
        });
    let mut grid = DataGrid::new("payments", table)
        .with_options(options)
        .with_sticky(StickyConfig::default().with_sticky_header(true));

    grid.mount(VIEWPORT);
    grid.frame_ready();
    println!("\nInitial page");
    print_page(&grid);
    print_sticky(grid.plan());

    let table = grid.table_mut();
    table.set_filter("status", ColumnFilter::multi_select(statuses.iter().take(2)));
    table.handle_sort("amount", false);
    table.handle_sort("amount", false);
    table.expand_row(&RowId::Int(7));
    grid.frame_ready();
    println!("\nPaid or due, largest amount first");
    print_page(&grid);

    // Resizes arriving from another task coalesce into one pass
    let (handle, mut receiver) = channel();
    let resizer = tokio::spawn(async move {
        for _ in 0..3 {
            handle.notify(LayoutTrigger::Resize);
        }
    });
    resizer.await?;
    grid.on_resize(360, VIEWPORT.height);
    while let Some(batch) = receiver.next_batch().await {
        grid.request_all(batch);
        grid.frame_ready();
    }
    println!("\nAfter resize to 360px ({} passes)", grid.scheduler().passes());
    print_sticky(grid.plan());

    grid.on_scroll(120, 0);
    let shadows = grid.shadows();
    println!(
        "\nScrolled to {}px, shadows left={} right={}",
        grid.scroll_metrics().scroll_left,
        shadows.left,
        shadows.right
    );
    grid.on_scroll_end();

    if let Some(rect) = grid.layout().get("payments-r0").copied() {
        let action = grid.handle_click(5, rect.y + 1, false);
        println!("Clicked first row expand toggle: {action:?}");
    }
    grid.frame_ready();

    println!("\nEvents");
    for event in grid.drain_events() {
        println!("  {}", event.name());
    }

    grid.unmount();
    log::info!("datagrid demo finished");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}
