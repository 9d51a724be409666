//! # Component activation.
//!
//! Turns a [`DiscoveredComponent`] into a live instance plus its initializer markers.
//!
//! ```text
//! definition.is_initializable()?
//!   ├─ no  → None
//!   └─ yes → instantiate()                  (no constructor / ctor failure → fatal)
//!            for each InitializerSpec:
//!              ├─ entry point exposed?      (no → UnknownEntryPoint)
//!              └─ every schedule valid?     (no → InvalidSchedule)
//!            → Some(Activation)
//! ```

use crate::components::ComponentRef;
use crate::error::ActivationError;
use crate::markers::InitializerSpec;
use crate::scanner::DiscoveredComponent;

/// A live component and the initializers to run on it.
pub struct Activation {
    /// Qualified component name.
    pub component: String,
    /// The instance; shared with scheduled timers.
    pub instance: ComponentRef,
    /// Initializer markers in declaration order.
    pub initializers: Vec<InitializerSpec>,
}

/// Instantiates `discovered` if it carries the initializable marker.
pub fn activate(discovered: &DiscoveredComponent) -> Result<Option<Activation>, ActivationError> {
    let def = &discovered.definition;
    if !def.is_initializable() {
        return Ok(None);
    }

    let instance = def.instantiate()?;
    let exposed = instance.entry_points();

    for spec in def.initializers() {
        if !exposed.iter().any(|name| *name == spec.entry_point()) {
            return Err(ActivationError::UnknownEntryPoint(
                spec.entry_point().to_string(),
            ));
        }
        for schedule in spec.schedules() {
            schedule
                .validate()
                .map_err(|reason| ActivationError::InvalidSchedule {
                    entry_point: spec.entry_point().to_string(),
                    reason,
                })?;
        }
    }

    Ok(Some(Activation {
        component: discovered.handle.name().to_string(),
        instance,
        initializers: def.initializers().to_vec(),
    }))
}
