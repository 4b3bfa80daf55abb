use std::io::Write;

use jbw_core::{Direction, Position};
use jbw_gen::EnergyModel;
use jbw_sim::{ConfigError, SimConfig};

const SMALL_WORLD: &str = r#"
seed: 42
patch_size: 8
vision_radius: 3
mcmc_iterations: 10
items:
  - name: apple
    color: [1.0, 0.0, 0.0]
    intensity: { kind: constant, value: -2.0 }
  - name: rock
    color: [0.5, 0.5, 0.5]
    blocks_movement: true
goal_item: apple
wall_item: rock
"#;

#[test]
fn embedded_config_describes_the_four_item_world() {
    let config = SimConfig::embedded().expect("embedded yaml parses");
    assert_eq!(config.patch_size, 32);
    assert_eq!(config.vision_radius, 5);
    assert_eq!(config.mcmc_iterations, 4000);
    assert_eq!(config.allowed_moves, vec![Direction::Up]);
    assert_eq!(config.allowed_turns, vec![Direction::Left, Direction::Right]);

    let catalog = config.validate().expect("embedded config is valid");
    let names: Vec<&str> = catalog.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["banana", "onion", "jellybean", "wall"]);
    assert!(catalog.get(3).expect("wall").blocks_movement);

    let signatures = config.signatures(&catalog).expect("goal exists");
    assert_eq!(signatures.goal, vec![0.0, 0.0, 1.0]);
    assert_eq!(signatures.wall, vec![0.5, 0.5, 0.5]);
}

#[test]
fn embedded_wall_energy_favours_straight_segments() {
    let catalog = SimConfig::embedded()
        .expect("embedded yaml parses")
        .validate()
        .expect("embedded config is valid");
    let wall = catalog.index_of("wall").expect("wall");
    let o = Position::ORIGIN;

    assert_eq!(catalog.interaction(o, Position::new(0, 5), wall, wall), 20.0);
    assert_eq!(catalog.interaction(o, Position::new(1, 1), wall, wall), -200.0);
    assert_eq!(catalog.interaction(o, Position::new(12, 0), wall, wall), -20.0);
    assert_eq!(catalog.interaction(o, Position::new(12, 1), wall, wall), 1.0);
    assert_eq!(catalog.interaction(o, Position::new(20, 0), wall, wall), 0.0);
}

#[test]
fn embedded_onion_repulsion_uses_a_single_band() {
    let catalog = SimConfig::embedded()
        .expect("embedded yaml parses")
        .validate()
        .expect("embedded config is valid");
    let banana = catalog.index_of("banana").expect("banana");
    let onion = catalog.index_of("onion").expect("onion");
    let o = Position::ORIGIN;

    assert_eq!(catalog.interaction(o, Position::new(0, 1), banana, onion), -6.0);
    assert_eq!(catalog.interaction(o, Position::new(15, 0), banana, onion), 0.0);
}

#[test]
fn loads_from_a_file_and_fills_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SMALL_WORLD.as_bytes()).expect("write config");

    let config = SimConfig::load(file.path()).expect("load");
    assert_eq!(config.seed, 42);
    assert_eq!(config.patch_size, 8);
    assert_eq!(config.color_dimension, 3);
    assert_eq!(config.max_steps_per_movement, 1);
    assert_eq!(config.agent_color, vec![0.0, 0.0, 1.0]);
    assert_eq!(config.goal_item, "apple");

    let catalog = config.validate().expect("valid");
    assert_eq!(catalog.len(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = SimConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = SimConfig::from_yaml_str("patch_size: [1, 2]").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn invalid_settings_are_rejected() {
    let base = SimConfig::from_yaml_str(SMALL_WORLD).expect("yaml");

    let mut config = base.clone();
    config.patch_size = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "patch_size", .. })
    ));

    let mut config = base.clone();
    config.vision_radius = -1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "vision_radius", .. })
    ));

    let mut config = base.clone();
    config.max_steps_per_movement = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "max_steps_per_movement", .. })
    ));

    let mut config = base.clone();
    config.agent_color = vec![1.0];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "agent_color", .. })
    ));

    let mut config = base.clone();
    config.goal_item = "pear".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::UnknownGoalItem(name)) if name == "pear"
    ));

    let mut config = base;
    config.items.item_types.clear();
    assert!(matches!(config.validate(), Err(ConfigError::Catalog(_))));
}

#[test]
fn missing_wall_item_gives_an_unmatchable_signature() {
    let mut config = SimConfig::from_yaml_str(SMALL_WORLD).expect("yaml");
    config.wall_item = Some("fence".to_string());
    let catalog = config.validate().expect("wall item is optional");
    let signatures = config.signatures(&catalog).expect("goal exists");
    assert_eq!(signatures.goal, vec![1.0, 0.0, 0.0]);
    assert_eq!(signatures.wall, vec![-1.0; 3]);
}
