use lockin_core::streak::local_today;
use lockin_core::{Database, StreakGrid};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let grid = StreakGrid::load(&db, local_today());
    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        crate::ui::print_grid(&grid);
    }
    Ok(())
}
