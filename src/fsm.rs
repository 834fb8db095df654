//! Generic finite-state machine with per-state lifecycle hooks.
//!
//! A machine owns one boxed [`State`] per identifier and dispatches the
//! frame / fixed-tick hooks to whichever one is current. States never call
//! back into the machine: they return `Some(id)` from a hook to request a
//! transition, and the machine performs it (`exit` on the old state, then
//! `init` on the new one) before the dispatch call returns.
//!
//! # Usage
//! ```ignore
//! let mut fsm = StateMachine::new();
//! fsm.register(Mode::Idle, Box::new(Idle))?;
//! fsm.register(Mode::Busy, Box::new(Busy::default()))?;
//! fsm.transition(Mode::Idle, &mut ctx)?;
//! // Each frame:
//! fsm.dispatch_update(&mut ctx, dt)?;
//! // Each fixed tick:
//! fsm.dispatch_fixed_update(&mut ctx, fixed_dt)?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

/// Lifecycle contract for a single behaviour. Every hook defaults to a
/// no-op, so implementors override only what they need.
///
/// `C` is the shared context (the actor) that the machine threads through
/// each call. `Id` is the identifier type a hook may return to request a
/// transition.
pub trait State<Id, C> {
    /// Called once, right after this state becomes current and before any
    /// other hook of the same activation.
    fn init(&mut self, _ctx: &mut C) {}

    /// Called once per variable-timestep frame.
    fn update(&mut self, _ctx: &mut C, _dt: f32) -> Option<Id> {
        None
    }

    /// Called once per fixed-timestep tick.
    fn fixed_update(&mut self, _ctx: &mut C, _dt: f32) -> Option<Id> {
        None
    }

    /// Called once when this state stops being current, before the next
    /// state's `init`. Per-state accumulators must be reset here.
    fn exit(&mut self, _ctx: &mut C) {}
}

/// Stand-in for "no state yet". Absorbs dispatch before the first transition.
pub struct EmptyState;

impl<Id, C> State<Id, C> for EmptyState {}

/// Setup-time precondition violations. Neither can happen once a machine
/// has been populated correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// `register` was called twice for the same id.
    DuplicateState(String),
    /// A transition targeted an id that was never registered.
    UnknownState(String),
}

impl fmt::Display for FsmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DuplicateState(id) => write!(f, "state '{}' is already registered", id),
            Self::UnknownState(id) => {
                write!(f, "tried to transition to state '{}' but it is not registered", id)
            },
        }
    }
}

impl std::error::Error for FsmError {}

pub struct StateMachine<Id, C> {
    states: HashMap<Id, Box<dyn State<Id, C>>>,
    current: Option<Id>,
    empty: EmptyState,
}

impl<Id, C> StateMachine<Id, C>
where
    Id: Copy + Eq + Hash + fmt::Debug,
{
    /// Create an empty machine. Nothing is current until the first
    /// [`transition`](Self::transition).
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            empty: EmptyState,
        }
    }

    pub fn register(&mut self, id: Id, state: Box<dyn State<Id, C>>) -> Result<(), FsmError> {
        if self.states.contains_key(&id) {
            return Err(FsmError::DuplicateState(format!("{:?}", id)));
        }
        self.states.insert(id, state);
        Ok(())
    }

    /// Make `id` the active state.
    ///
    /// Order is fixed: the new id is published first, then the old state
    /// exits, then the new state is initialised. Code running inside `exit`
    /// therefore already sees `current() == Some(id)`.
    ///
    /// Transitioning to the already-current id runs `exit` and `init` on the
    /// same instance.
    pub fn transition(&mut self, id: Id, ctx: &mut C) -> Result<(), FsmError> {
        if !self.states.contains_key(&id) {
            return Err(FsmError::UnknownState(format!("{:?}", id)));
        }

        let previous = self.current.replace(id);
        debug!(from = ?previous, to = ?id, "state transition");

        match previous.and_then(|prev| self.states.get_mut(&prev)) {
            Some(state) => state.exit(ctx),
            None => State::<Id, C>::exit(&mut self.empty, ctx),
        }

        if let Some(state) = self.states.get_mut(&id) {
            state.init(ctx);
        }
        Ok(())
    }

    /// Forward a frame to the active state, then run any transition it asked for.
    pub fn dispatch_update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        match self.active().update(ctx, dt) {
            Some(next) => self.transition(next, ctx),
            None => Ok(()),
        }
    }

    /// Forward a fixed tick to the active state, then run any transition it asked for.
    pub fn dispatch_fixed_update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        match self.active().fixed_update(ctx, dt) {
            Some(next) => self.transition(next, ctx),
            None => Ok(()),
        }
    }

    pub fn current(&self) -> Option<Id> {
        self.current
    }

    pub fn is_registered(&self, id: Id) -> bool {
        self.states.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn active(&mut self) -> &mut dyn State<Id, C> {
        match self.current.and_then(|id| self.states.get_mut(&id)) {
            Some(state) => &mut **state,
            None => &mut self.empty,
        }
    }
}

impl<Id, C> Default for StateMachine<Id, C>
where
    Id: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
