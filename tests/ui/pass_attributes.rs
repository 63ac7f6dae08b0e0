use std::collections::HashMap;
use std::time::Duration;

use layerconf::{Configurable, FieldKind, Populator};

#[derive(Debug, Default, Configurable)]
#[config(rename_all = "SCREAMING_SNAKE_CASE")]
struct Settings {
    #[config(default = "8080", required = "yes")]
    port: u16,
    #[config(src = "DATABASE")]
    database_url: String,
    #[config(required = false, default = 2.5)]
    ratio: f64,
    #[config(default = "1m")]
    timeout: Duration,
    #[config(skip)]
    handle: Option<std::fs::File>,
    #[config(layout = "%Y-%m-%d")]
    #[config(default = "2024-01-01")]
    since: jiff::civil::Date,
}

fn main() {
    let fields = Settings::describe();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0].name, "PORT");
    assert!(fields[0].required);
    assert_eq!(fields[1].key(), "DATABASE");
    assert_eq!(fields[2].default.as_deref(), Some("2.5"));
    assert_eq!(fields[3].kind, FieldKind::Duration);
    assert_eq!(fields[4].layout.as_deref(), Some("%Y-%m-%d"));

    let values = HashMap::from([("DATABASE".to_string(), "postgres://db".to_string())]);
    let mut settings = Settings::default();
    Populator::new(&values).populate(&mut settings).unwrap();
    assert_eq!(settings.port, 8080);
    assert_eq!(settings.database_url, "postgres://db");
    assert_eq!(settings.since, jiff::civil::date(2024, 1, 1));
    assert!(settings.handle.is_none());
}
