use std::path::Path;

use craft_planner::calculator::calculate_plan;
use craft_planner::{db, extract, ItemQuantity, PlannerConfig};
use rusqlite::Connection;

#[test]
fn demo_definitions_import_and_plan() {
    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();

    let stats = extract::extract_to_database(&conn, &demos).unwrap();
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.items, 5);
    assert_eq!(stats.recipes, 3);
    assert_eq!(stats.orders, 7);

    let plan = calculate_plan(&conn, &ItemQuantity::new("frame", 5), PlannerConfig::default())
        .unwrap()
        .unwrap();

    assert_eq!(plan.total_cost, 58);
    assert!(plan.trade("frame_bid").is_none());
}
