use predprey_core::{SimConfig, World};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python handle on one simulation. Configuration is passed as JSON; missing
/// fields take the defaults of `default_config_json()`.
#[pyclass(name = "Simulation")]
struct PySimulation {
    world: World,
}

#[pymethods]
impl PySimulation {
    #[new]
    #[pyo3(signature = (seed, config_json=None))]
    fn new(seed: u64, config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => SimConfig::from_json(json),
            None => Ok(SimConfig::default()),
        }
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let world = World::try_new(config, seed).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { world })
    }

    fn step(&mut self) {
        self.world.step();
    }

    /// Step up to `ticks` times, stopping early when finished. Returns ticks run.
    fn run(&mut self, ticks: usize) -> usize {
        self.world.run(ticks)
    }

    fn is_finished(&self) -> bool {
        self.world.is_finished()
    }

    /// `(prey, predator)`.
    fn counts(&self) -> (usize, usize) {
        self.world.counts()
    }

    fn current_tick(&self) -> usize {
        self.world.current_tick()
    }

    fn metrics_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.world.collect_step_metrics())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pyfunction]
fn default_config_json() -> PyResult<String> {
    serde_json::to_string_pretty(&SimConfig::default())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    m.add_class::<PySimulation>()?;
    Ok(())
}
