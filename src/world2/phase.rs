//! The operation set every generation phase implements.
//!
//! The machine calls, in order: `initialize` always; `before`, `execute`
//! and `tear_down` only while the phase's layer is incomplete;
//! `prepare_display` and `finalize` always. Defaults cover the common
//! case, so most phases only provide a name and `execute`.

use super::layers::Layer;
use super::state::World;

pub trait PhaseProcessor {
    /// Display name, without the index prefix.
    fn name(&self) -> &str;

    /// Restore the layer's snapshot if the phase already ran.
    fn initialize(&self, world: &mut World, layer: &Layer) {
        if layer.is_complete {
            layer.restore(world);
        }
    }

    /// Set up per-layer scratch data.
    fn before(&self, _world: &mut World) {}

    fn execute(&self, world: &mut World);

    /// Snapshot the result into the layer and mark it complete.
    fn tear_down(&self, world: &World, layer: &mut Layer) {
        layer.capture(world);
    }

    /// Build display overlays from the current state.
    fn prepare_display(&self, _world: &mut World) {}

    fn finalize(&self, _world: &mut World) {}

    /// Forget the phase's result.
    fn reset(&self, layer: &mut Layer) {
        layer.clear();
    }
}
