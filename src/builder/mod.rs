//! Builder API for ergonomic state machine construction.
//!
//! [`MachineBuilder`] declares states and transitions by name, which reads
//! better than threading [`StateId`](crate::core::StateId) handles through
//! setup code when a machine is defined once and instantiated many times.
//!
//! # Example
//!
//! ```
//! use ludum::builder::MachineBuilder;
//! use ludum::core::StateHooks;
//!
//! #[derive(Clone)]
//! struct Guard {
//!     alert: bool,
//! }
//!
//! let template = MachineBuilder::new("Guard", Guard { alert: false })
//!     .state("PATROL", StateHooks::new())
//!     .state("CHASE", StateHooks::new())
//!     .transition("PATROL", "CHASE", |ctx| ctx.data().alert)
//!     .build()
//!     .unwrap();
//!
//! let mut guard = template.new_instance();
//! guard.start().unwrap();
//! guard.data_mut().alert = true;
//! guard.update(0.1).unwrap();
//! assert_eq!(guard.current_state_name(), Some("CHASE"));
//! ```

pub mod machine;

pub use machine::MachineBuilder;
