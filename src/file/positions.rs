use std::fmt;

use super::{SofaError, SofaFile};
use crate::layout::{FlatBuffer, Mismatch, ShapeMismatch};
use crate::schema::{
    ATTR_TYPE, ATTR_UNITS, VAR_EMITTER_POSITION, VAR_EMITTER_UP, VAR_EMITTER_VIEW,
    VAR_LISTENER_POSITION, VAR_LISTENER_UP, VAR_LISTENER_VIEW, VAR_RECEIVER_POSITION,
    VAR_RECEIVER_UP, VAR_RECEIVER_VIEW, VAR_SOURCE_POSITION, VAR_SOURCE_UP, VAR_SOURCE_VIEW,
};
use crate::store::AttributeScope;
use crate::units::{CoordinateSystem, Units};

/// Acoustic actor carrying position metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The listener (one per measurement)
    Listener,
    /// The source (one per measurement)
    Source,
    /// Receivers, e.g. the ears of a listener
    Receiver,
    /// Emitters, e.g. the drivers of a loudspeaker
    Emitter,
}

/// Which vector of a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionKind {
    /// Location
    Position,
    /// Facing direction
    View,
    /// Up direction
    Up,
}

impl Role {
    /// Every role
    pub const ALL: [Role; 4] = [Role::Listener, Role::Source, Role::Receiver, Role::Emitter];

    /// Name of the variable holding `kind` for this role
    pub fn variable(self, kind: PositionKind) -> &'static str {
        use PositionKind::*;
        match (self, kind) {
            (Role::Listener, Position) => VAR_LISTENER_POSITION,
            (Role::Listener, View) => VAR_LISTENER_VIEW,
            (Role::Listener, Up) => VAR_LISTENER_UP,
            (Role::Source, Position) => VAR_SOURCE_POSITION,
            (Role::Source, View) => VAR_SOURCE_VIEW,
            (Role::Source, Up) => VAR_SOURCE_UP,
            (Role::Receiver, Position) => VAR_RECEIVER_POSITION,
            (Role::Receiver, View) => VAR_RECEIVER_VIEW,
            (Role::Receiver, Up) => VAR_RECEIVER_UP,
            (Role::Emitter, Position) => VAR_EMITTER_POSITION,
            (Role::Emitter, View) => VAR_EMITTER_VIEW,
            (Role::Emitter, Up) => VAR_EMITTER_UP,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Listener => "Listener",
            Role::Source => "Source",
            Role::Receiver => "Receiver",
            Role::Emitter => "Emitter",
        };
        f.write_str(name)
    }
}

impl SofaFile {
    /// Coordinate system and units declared on a position, view or up variable
    pub fn position(
        &self,
        role: Role,
        kind: PositionKind,
    ) -> Result<(CoordinateSystem, Units), SofaError> {
        let name = role.variable(kind);
        let coordinates = CoordinateSystem::from_name(&self.variable_attribute_text(name, ATTR_TYPE)?)?;
        let units = Units::from_name(&self.variable_attribute_text(name, ATTR_UNITS)?)?;
        Ok((coordinates, units))
    }

    /// Values of a position, view or up variable, at whichever rank the file uses
    ///
    /// Rank 2 is `[count, C]` (one vector per role instance), rank 3 is
    /// `[count, C, I|M]` (one vector per measurement). Any other rank is a
    /// [`ShapeMismatch`].
    pub fn position_values(&self, role: Role, kind: PositionKind) -> Result<FlatBuffer, SofaError> {
        self.position_values_of_rank(role.variable(kind), &[2, 3])
    }

    /// Values of a rank-2 position variable; other ranks are a [`ShapeMismatch`]
    pub fn position_values_2d(
        &self,
        role: Role,
        kind: PositionKind,
    ) -> Result<FlatBuffer, SofaError> {
        self.position_values_of_rank(role.variable(kind), &[2])
    }

    /// Values of a rank-3 position variable; other ranks are a [`ShapeMismatch`]
    pub fn position_values_3d(
        &self,
        role: Role,
        kind: PositionKind,
    ) -> Result<FlatBuffer, SofaError> {
        self.position_values_of_rank(role.variable(kind), &[3])
    }

    fn position_values_of_rank(&self, name: &str, ranks: &[usize]) -> Result<FlatBuffer, SofaError> {
        let shape = self.shape_of(name)?;
        if !ranks.contains(&shape.len()) {
            return Err(ShapeMismatch::new(
                name,
                Mismatch::Rank {
                    expected: ranks.to_vec(),
                    found: shape.len(),
                },
            )
            .into());
        }
        // axis sizes must agree with the rest of the file
        self.dimensions()?;
        self.read_buffer(name, shape)
    }

    /// Declare the coordinate system and units of a position, view or up variable
    pub fn set_position(
        &mut self,
        role: Role,
        kind: PositionKind,
        coordinates: CoordinateSystem,
        units: Units,
    ) -> Result<(), SofaError> {
        let name = role.variable(kind);
        if !self.has_variable(name) {
            return Err(SofaError::MissingVariable(name.to_string()));
        }
        if !coordinates.accepts(units) {
            return Err(SofaError::InvalidAttribute {
                name: format!("{}:{}", name, ATTR_UNITS),
                reason: format!("{} coordinates require '{}'", coordinates, coordinates.expected_units()),
            });
        }
        self.write_attribute(AttributeScope::Variable(name), ATTR_TYPE, coordinates.name().into())?;
        self.write_attribute(AttributeScope::Variable(name), ATTR_UNITS, units.name().into())
    }

    /// Overwrite a position, view or up variable; the buffer must have the stored shape
    pub fn set_position_values(
        &mut self,
        role: Role,
        kind: PositionKind,
        values: &FlatBuffer,
    ) -> Result<(), SofaError> {
        self.write_buffer(role.variable(kind), values)
    }
}
