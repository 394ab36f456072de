use js_sys::Float64Array;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use symbo_linkage_core::{
    edge_length_gradients, fill_positions, optimize_for_path, optimize_for_target, simulate,
    solve_triangle, JointId, Linkage, LinkageError, OptimizerConfig, PathOptimizerConfig, Vec2,
};

fn js_err(err: impl ToString) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Pair up a flat `[x0, y0, x1, y1, ...]` buffer.
fn points_from_flat(xy: &[f64]) -> Result<Vec<Vec2>, String> {
    if xy.len() % 2 != 0 {
        return Err(format!(
            "path buffer must hold x/y pairs, got {} values",
            xy.len()
        ));
    }
    Ok(xy
        .chunks_exact(2)
        .map(|pair| Vec2::new(pair[0], pair[1]))
        .collect())
}

fn flatten_points(points: &[Vec2]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

fn joint_id(index: u32) -> JointId {
    index as JointId
}

/// One linkage owned by the JS side. Construction calls fail fast; the simulation-step
/// calls report a success flag and keep the failure text in [`WasmLinkage::last_error`].
#[wasm_bindgen]
pub struct WasmLinkage {
    linkage: Linkage,
    last_error: Option<String>,
}

impl Default for WasmLinkage {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmLinkage {
    fn record<T>(&mut self, result: Result<T, LinkageError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                None
            }
        }
    }
}

#[wasm_bindgen]
impl WasmLinkage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmLinkage {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        WasmLinkage {
            linkage: Linkage::new(),
            last_error: None,
        }
    }

    /// Drop every joint and bar.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.linkage.reset();
        self.last_error = None;
    }

    /// Replace the current linkage with a JSON definition. The result is not prepared.
    #[wasm_bindgen]
    pub fn load_linkage(&mut self, json: &str) -> Result<(), JsValue> {
        let mut linkage = Linkage::from_json(json).map_err(js_err)?;
        linkage.set_optimizer_config(*self.linkage.optimizer_config());
        self.linkage = linkage;
        self.last_error = None;
        Ok(())
    }

    /// Current joints and bars as a JSON definition.
    #[wasm_bindgen]
    pub fn export_linkage(&self) -> Result<String, JsValue> {
        self.linkage.to_spec().to_json().map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn add_static_vertex(&mut self, x: f64, y: f64) -> u32 {
        self.linkage.add_static_joint(x, y) as u32
    }

    /// `distance` defaults to the distance between the new vertex and its motor.
    #[wasm_bindgen]
    pub fn add_motorized_vertex(
        &mut self,
        x: f64,
        y: f64,
        motor: u32,
        distance: Option<f64>,
    ) -> Result<u32, JsValue> {
        self.linkage
            .add_motorized_joint(x, y, joint_id(motor), distance)
            .map(|index| index as u32)
            .map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn add_dynamic_vertex(&mut self, x: f64, y: f64) -> u32 {
        self.linkage.add_dynamic_joint(x, y) as u32
    }

    /// Connect two vertices. Returns the bar's index in the flat edge sequence.
    #[wasm_bindgen]
    pub fn add_edge(&mut self, a: u32, b: u32) -> Result<u32, JsValue> {
        self.linkage
            .add_bar(joint_id(a), joint_id(b))
            .map(|bar| bar as u32)
            .map_err(js_err)
    }

    /// Resolve dependencies. Must succeed before any simulation call.
    #[wasm_bindgen]
    pub fn prepare_simulation(&mut self) -> bool {
        let result = self.linkage.prepare();
        self.record(result).is_some()
    }

    /// False (and no change) when `joint` is not a motorized vertex.
    #[wasm_bindgen]
    pub fn set_motor_rotation(&mut self, joint: u32, angle: f64) -> bool {
        let result = self.linkage.set_motor_rotation(joint_id(joint), angle);
        self.record(result).is_some()
    }

    #[wasm_bindgen]
    pub fn joint_count(&self) -> u32 {
        self.linkage.joint_count() as u32
    }

    #[wasm_bindgen]
    pub fn edge_count(&self) -> u32 {
        self.linkage.bars().len() as u32
    }

    /// Fill `xs`/`ys` (each sized to [`WasmLinkage::joint_count`]) with simulated positions.
    #[wasm_bindgen]
    pub fn get_simulated_positions(&mut self, xs: &mut [f64], ys: &mut [f64]) -> bool {
        let result = fill_positions(&self.linkage, xs, ys);
        self.record(result).is_some()
    }

    /// Simulated positions as an interleaved `[x0, y0, x1, y1, ...]` array.
    #[wasm_bindgen]
    pub fn simulated_positions(&mut self) -> Result<Float64Array, JsValue> {
        let positions = simulate(&self.linkage).map_err(js_err)?;
        Ok(Float64Array::from(flatten_points(&positions).as_slice()))
    }

    /// `{ objective, bars: [{ a, b, gradient }, ...] }` for moving `target` toward `(x, y)`.
    #[wasm_bindgen]
    pub fn get_edge_length_gradients(
        &self,
        target: u32,
        x: f64,
        y: f64,
    ) -> Result<JsValue, JsValue> {
        let gradients = edge_length_gradients(&self.linkage, joint_id(target), Vec2::new(x, y))
            .map_err(js_err)?;
        swb::to_value(&gradients).map_err(js_err)
    }

    /// One bounded optimizer step toward `(x, y)`.
    #[wasm_bindgen]
    pub fn optimize_for_target(&mut self, target: u32, x: f64, y: f64) -> bool {
        let result = optimize_for_target(&mut self.linkage, joint_id(target), Vec2::new(x, y));
        self.record(result).is_some()
    }

    /// One bounded optimizer step toward a polyline given as interleaved x/y values.
    #[wasm_bindgen]
    pub fn optimize_for_target_path(
        &mut self,
        target: u32,
        path_xy: &[f64],
        resolution: u32,
    ) -> Result<bool, JsValue> {
        let path = points_from_flat(path_xy).map_err(js_err)?;
        let config = PathOptimizerConfig {
            resolution: resolution as usize,
            step: *self.linkage.optimizer_config(),
        };
        let result = optimize_for_path(&mut self.linkage, joint_id(target), &path, &config);
        Ok(self.record(result).is_some())
    }

    /// Replace the optimizer settings from JSON; omitted fields take their defaults.
    #[wasm_bindgen]
    pub fn set_optimizer_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config: OptimizerConfig = serde_json::from_str(json).map_err(js_err)?;
        self.linkage.set_optimizer_config(config);
        Ok(())
    }

    /// Message of the most recent failed flag-returning call, cleared on success.
    #[wasm_bindgen]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

/// Solve a single triangle: position of `k` given `i`, `j`, `|ik|` and `|jk|`, with
/// `i -> j -> k` counter-clockwise. Returns `[x, y]`; NaN when the lengths do not close.
#[wasm_bindgen]
pub fn symbolic_kinematic(
    ix: f64,
    iy: f64,
    jx: f64,
    jy: f64,
    dist_ik: f64,
    dist_jk: f64,
) -> Vec<f64> {
    let k = solve_triangle(Vec2::new(ix, iy), Vec2::new(jx, jy), dist_ik, dist_jk);
    vec![k.x, k.y]
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_pair_flat_paths() {
        let points = points_from_flat(&[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(points, vec![Vec2::new(0.0, 1.0), Vec2::new(2.0, 3.0)]);
        assert_eq!(flatten_points(&points), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(points_from_flat(&[1.0, 2.0, 3.0]).is_err());
        assert!(points_from_flat(&[]).unwrap().is_empty());
    }

    #[test]
    fn it_should_solve_a_single_triangle() {
        let k = symbolic_kinematic(0.0, 0.0, 2.0, 0.0, 2f64.sqrt(), 2f64.sqrt());
        assert!((k[0] - 1.0).abs() < 1e-12);
        assert!((k[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flag_calls_keep_the_last_error() {
        let mut linkage = WasmLinkage::new();
        let hub = linkage.add_static_vertex(0.0, 0.0);
        assert!(!linkage.set_motor_rotation(hub, 1.0));
        assert!(linkage.last_error().unwrap().contains("not motorized"));
        assert!(linkage.prepare_simulation());
        assert_eq!(linkage.last_error(), None);
    }
}
