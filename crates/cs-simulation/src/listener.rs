use cs_core::Entity;

/// Observer of world notifications, e.g. a renderer or a recorder.
///
/// All methods default to doing nothing. Notifications arrive in the order
/// the frame produces them: frame start, then one `attack_occurred` per
/// applied attack, `entity_killed` for each death (ascending id, before the
/// unit is removed), then `attacks_resolved`.
pub trait WorldListener {
    /// A frame is about to run agent decisions.
    fn frame_started(&mut self, _frame: u64) {}

    /// An attack was applied. `target` already reflects the damage.
    fn attack_occurred(&mut self, _attacker: &Entity, _target: &Entity) {}

    /// A unit died this frame and is about to be removed.
    fn entity_killed(&mut self, _entity: &Entity) {}

    /// The attack phase of the frame is complete.
    fn attacks_resolved(&mut self) {}

    /// The game ended.
    fn game_ended(&mut self) {}
}

/// Listener that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl WorldListener for NullListener {}
