/// Core simulation systems: tick management and config initialization.

use bevy::prelude::*;
use crate::game::config::InitialConfig;

use super::resources::*;

/// Increment the global simulation tick counter.
///
/// Runs first in FixedUpdate so every other system sees the current tick.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

/// Derive [`SimConfig`] from [`InitialConfig`] and set the fixed timestep.
pub fn init_sim_config_from_initial(
    mut fixed_time: ResMut<Time<Fixed>>,
    mut sim_config: ResMut<SimConfig>,
    initial_config: Option<Res<InitialConfig>>,
) {
    let config = match initial_config {
        Some(cfg) => match cfg.validate() {
            Ok(()) => cfg.clone(),
            Err(reason) => {
                error!("InitialConfig rejected ({}), using defaults", reason);
                InitialConfig::default()
            }
        },
        None => {
            warn!("InitialConfig not found, using defaults");
            InitialConfig::default()
        }
    };

    fixed_time.set_timestep_seconds(1.0 / config.tick_rate);
    *sim_config = SimConfig::from(&config);

    info!("SimConfig initialized: {} ticks/s, path speed {}, trigger distance {}",
          sim_config.tick_rate, sim_config.path_speed, sim_config.trigger_distance);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tick_rate_falls_back_to_default_timestep() {
        let mut app = App::new();
        app.init_resource::<Time<Fixed>>();
        app.init_resource::<SimConfig>();
        app.insert_resource(InitialConfig { tick_rate: 0.0, ..InitialConfig::default() });
        app.add_systems(Update, init_sim_config_from_initial);

        app.update();

        assert_eq!(app.world().resource::<SimConfig>().tick_rate, 60.0);
        let step = app.world().resource::<Time<Fixed>>().timestep().as_secs_f64();
        assert!((step - 1.0 / 60.0).abs() < 1e-9);
    }
}
