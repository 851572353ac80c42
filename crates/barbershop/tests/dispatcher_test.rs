//! End-to-end runs of the shop through the dispatcher.

use std::io::Write;
use std::time::Duration;

use barbershop::{run_arrivals, spawn_line_arrivals, Arrival, ArrivalSchedule, Role, Shop};
use barbershop_core::{Activity, CustomerOutcome, CustomerState, ShopConfig, ShopError};
use crossbeam_channel::unbounded;

fn instant(config: ShopConfig) -> ShopConfig {
    let mut config = config;
    config.stage.time_scale = 0.0;
    config
}

#[test]
fn test_scripted_run_accounts_for_everyone() {
    let config = instant(
        ShopConfig::default().with_capacity(2).with_service_duration(Duration::from_millis(20)),
    );
    let shop = Shop::open(config).unwrap();

    let (tx, rx) = unbounded();
    ArrivalSchedule {
        count: 12,
        interval: Duration::from_millis(2),
        jitter: Duration::from_millis(3),
        seed: 9,
    }
    .spawn(tx)
    .unwrap();

    let summary = run_arrivals(&shop, &rx).unwrap();

    assert_eq!(summary.admitted, 12);
    assert_eq!(summary.served + summary.rejected, 12);
    assert!(summary.served >= 2);

    let stats = shop.stats();
    assert_eq!(stats.arrivals, 12);
    assert_eq!(stats.served, summary.served);
    assert_eq!(stats.rejected, summary.rejected);
    assert!(stats.peak_occupancy <= 2);
    assert_eq!(shop.floor().room.current_occupancy(), 0);

    for report in &summary.reports {
        match report.outcome {
            CustomerOutcome::Served { seat } => {
                assert!(seat < 2);
                assert_eq!(report.trail.last(), Some(&CustomerState::Departed));
            }
            CustomerOutcome::Rejected => {
                assert_eq!(report.trail, vec![CustomerState::Arriving, CustomerState::Rejected]);
            }
        }
    }
}

#[test]
fn test_only_the_barber_remains_on_stage() {
    let config = instant(ShopConfig::default().with_service_duration(Duration::from_millis(5)));
    let shop = Shop::open(config).unwrap();

    let (tx, rx) = unbounded();
    for _ in 0..3 {
        tx.send(Arrival).unwrap();
    }
    drop(tx);
    let summary = run_arrivals(&shop, &rx).unwrap();
    assert_eq!(summary.served, 3);

    let views = shop.stage().snapshot();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].role, Role::Barber);
    assert_eq!(shop.stage().diagnostics(), 0);
}

#[test]
fn test_barber_naps_in_the_chair_when_idle() {
    let config = instant(ShopConfig::default());
    let layout = config.layout.clone();
    let shop = Shop::open(config).unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    loop {
        let napping = shop.stage().snapshot().iter().any(|view| {
            view.role == Role::Barber
                && view.position == layout.barber_chair
                && view.activity == Activity::Blocked
        });
        if napping {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "barber never went to sleep");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_line_arrivals_drive_the_shop() {
    let config = instant(ShopConfig::default().with_service_duration(Duration::from_millis(1)));
    let shop = Shop::open(config).unwrap();

    let (tx, rx) = unbounded();
    spawn_line_arrivals(std::io::Cursor::new("\n\n"), tx).unwrap();
    let summary = run_arrivals(&shop, &rx).unwrap();

    assert_eq!(summary.admitted, 2);
    assert_eq!(summary.served, 2);
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
capacity = 5
service_duration_ms = 15

[stage]
time_scale = 0.0
"#
    )
    .unwrap();

    let config = ShopConfig::load(file.path()).unwrap();
    assert_eq!(config.capacity, 5);
    assert_eq!(config.service_duration(), Duration::from_millis(15));

    let shop = Shop::open(config).unwrap();
    assert_eq!(shop.floor().room.capacity(), 5);
}

#[test]
fn test_missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ShopConfig::load(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ShopError::ConfigIo { .. })));
}

#[test]
fn test_unknown_config_key_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "chairs = 3").unwrap();
    let result = ShopConfig::load(file.path());
    assert!(matches!(result, Err(ShopError::ConfigParse(_))));
}
