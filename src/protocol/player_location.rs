//! Player location record and its fixed 22-byte wire layout
//!
//! | Offset | Size | Field              |
//! |--------|------|--------------------|
//! | 0      | 4    | player_id (i32)    |
//! | 4      | 4    | x (f32)            |
//! | 8      | 4    | y (f32)            |
//! | 12     | 4    | movement_direction |
//! | 16     | 1    | movement_type      |
//! | 17     | 1    | reserved, always 0 |
//! | 18     | 4    | movement_speed     |
//!
//! All multi-byte fields are little-endian.
//!
//! Older encoders wrote the fields back to back (21 bytes, speed at offset 17)
//! while their decoders read speed at offset 18. Receivers in the field expect
//! the 22-byte shape, so both directions here use it. A 21-byte frame is
//! reported as truncated instead of being guessed at.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::game::PlayerStateView;

/// Movement state of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MovementType {
    /// Not moving
    Standing = 0,
    Walking = 1,
    Running = 2,
}

impl Default for MovementType {
    fn default() -> Self {
        Self::Standing
    }
}

impl From<MovementType> for u8 {
    fn from(movement_type: MovementType) -> Self {
        movement_type as u8
    }
}

impl TryFrom<u8> for MovementType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Standing),
            1 => Ok(Self::Walking),
            2 => Ok(Self::Running),
            other => Err(DecodeError::UnknownMovementType(other)),
        }
    }
}

/// Run and walk velocities are divided by this before they go on the wire.
pub const SPEED_DIVISOR: f32 = 4.0;

/// Byte offsets of each field, relative to the start of the record
pub mod offsets {
    /// `player_id`, i32
    pub const PLAYER_ID: usize = 0;
    /// `x`, f32
    pub const X: usize = 4;
    /// `y`, f32
    pub const Y: usize = 8;
    /// `movement_direction`, i32
    pub const MOVEMENT_DIRECTION: usize = 12;
    /// `movement_type` ordinal, one byte
    pub const MOVEMENT_TYPE: usize = 16;
    /// Padding byte, written as 0 and never read
    pub const RESERVED: usize = 17;
    /// `movement_speed`, f32
    pub const MOVEMENT_SPEED: usize = 18;
}

/// One player's location/movement snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerLocationRecord {
    pub player_id: i32,
    /// World position X
    pub x: f32,
    /// World position Y
    pub y: f32,
    /// Heading code, range owned by the movement model
    pub movement_direction: i32,
    pub movement_type: MovementType,
    /// Already scaled by [`SPEED_DIVISOR`] when built from a player state
    pub movement_speed: f32,
}

impl PlayerLocationRecord {
    /// Size of an encoded record in bytes
    pub const SIZE_IN_BYTES: usize = 22;

    /// Encode into a fresh 22-byte buffer
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::SIZE_IN_BYTES);
        self.encode_into(&mut buf);
        debug_assert_eq!(buf.len(), Self::SIZE_IN_BYTES);
        buf.freeze()
    }

    /// Append the 22 encoded bytes to `buf`
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_i32_le(self.player_id);
        buf.put_f32_le(self.x);
        buf.put_f32_le(self.y);
        buf.put_i32_le(self.movement_direction);
        buf.put_u8(self.movement_type.into());
        buf.put_u8(0);
        buf.put_f32_le(self.movement_speed);
    }

    /// Decode a record starting at `offset` in `data`
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let end = offset
            .checked_add(Self::SIZE_IN_BYTES)
            .filter(|end| *end <= data.len())
            .ok_or(DecodeError::Truncated {
                offset,
                needed: Self::SIZE_IN_BYTES,
                available: data.len().saturating_sub(offset),
            })?;

        let mut buf = &data[offset..end];

        let player_id = buf.get_i32_le();
        let x = buf.get_f32_le();
        let y = buf.get_f32_le();
        let movement_direction = buf.get_i32_le();
        let movement_type = MovementType::try_from(buf.get_u8())?;
        // Reserved byte is not interpreted
        buf.advance(1);
        let movement_speed = buf.get_f32_le();

        Ok(Self {
            player_id,
            x,
            y,
            movement_direction,
            movement_type,
            movement_speed,
        })
    }

    /// Build a record from a live player state.
    ///
    /// Speed is the run velocity while running and the walk velocity
    /// otherwise, divided by [`SPEED_DIVISOR`].
    pub fn from_player_state<S: PlayerStateView + ?Sized>(state: &S) -> Self {
        let (x, y) = state.position();
        let movement_type = state.movement_type();
        let velocity = match movement_type {
            MovementType::Running => state.run_velocity(),
            MovementType::Standing | MovementType::Walking => state.walk_velocity(),
        };

        Self {
            player_id: state.id(),
            x,
            y,
            movement_direction: state.movement_direction(),
            movement_type,
            movement_speed: velocity / SPEED_DIVISOR,
        }
    }
}

/// Record decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Truncated record at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Unknown movement type: {0}")]
    UnknownMovementType(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    struct TestPlayer {
        id: i32,
        position: (f32, f32),
        movement_type: MovementType,
        movement_direction: i32,
        run_velocity: f32,
        walk_velocity: f32,
    }

    impl PlayerStateView for TestPlayer {
        fn id(&self) -> i32 {
            self.id
        }

        fn position(&self) -> (f32, f32) {
            self.position
        }

        fn movement_type(&self) -> MovementType {
            self.movement_type
        }

        fn movement_direction(&self) -> i32 {
            self.movement_direction
        }

        fn run_velocity(&self) -> f32 {
            self.run_velocity
        }

        fn walk_velocity(&self) -> f32 {
            self.walk_velocity
        }
    }

    fn test_player(movement_type: MovementType) -> TestPlayer {
        TestPlayer {
            id: 42,
            position: (12.5, -3.0),
            movement_type,
            movement_direction: 5,
            run_velocity: 8.0,
            walk_velocity: 4.0,
        }
    }

    fn sample() -> PlayerLocationRecord {
        PlayerLocationRecord {
            player_id: 7,
            x: 100.5,
            y: -20.25,
            movement_direction: 3,
            movement_type: MovementType::Walking,
            movement_speed: 1.0,
        }
    }

    fn random_record(rng: &mut ChaCha8Rng) -> PlayerLocationRecord {
        let movement_type = match rng.gen_range(0..3u8) {
            0 => MovementType::Standing,
            1 => MovementType::Walking,
            _ => MovementType::Running,
        };
        PlayerLocationRecord {
            player_id: rng.gen(),
            x: rng.gen_range(-10_000.0..10_000.0),
            y: rng.gen_range(-10_000.0..10_000.0),
            movement_direction: rng.gen_range(-64..64),
            movement_type,
            movement_speed: rng.gen_range(0.0..50.0),
        }
    }

    #[test]
    fn encodes_fields_at_fixed_offsets() {
        let bytes = sample().encode();

        assert_eq!(bytes.len(), PlayerLocationRecord::SIZE_IN_BYTES);
        let word = |at: usize| -> [u8; 4] { bytes[at..at + 4].try_into().unwrap() };
        assert_eq!(i32::from_le_bytes(word(offsets::PLAYER_ID)), 7);
        assert_eq!(f32::from_le_bytes(word(offsets::X)), 100.5);
        assert_eq!(f32::from_le_bytes(word(offsets::Y)), -20.25);
        assert_eq!(i32::from_le_bytes(word(offsets::MOVEMENT_DIRECTION)), 3);
        assert_eq!(bytes[offsets::MOVEMENT_TYPE], 1);
        assert_eq!(bytes[offsets::RESERVED], 0);
        assert_eq!(f32::from_le_bytes(word(offsets::MOVEMENT_SPEED)), 1.0);

        assert_eq!(PlayerLocationRecord::decode(&bytes, 0), Ok(sample()));
    }

    #[test]
    fn random_records_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x10ca);
        for _ in 0..500 {
            let record = random_record(&mut rng);
            let bytes = record.encode();
            assert_eq!(bytes.len(), PlayerLocationRecord::SIZE_IN_BYTES);
            assert_eq!(PlayerLocationRecord::decode(&bytes, 0), Ok(record));
        }
    }

    #[test]
    fn extreme_values_round_trip() {
        let record = PlayerLocationRecord {
            player_id: i32::MIN,
            x: f32::MAX,
            y: f32::MIN_POSITIVE,
            movement_direction: i32::MAX,
            movement_type: MovementType::Running,
            movement_speed: f32::INFINITY,
        };
        assert_eq!(PlayerLocationRecord::decode(&record.encode(), 0), Ok(record));
    }

    #[test]
    fn decode_at_offset_matches_sliced_buffer() {
        let mut packet = BytesMut::new();
        packet.put_slice(&[0xAA; 9]);
        sample().encode_into(&mut packet);
        packet.put_slice(&[0xBB; 3]);

        let at_offset = PlayerLocationRecord::decode(&packet, 9).unwrap();
        let sliced = PlayerLocationRecord::decode(&packet[9..], 0).unwrap();
        assert_eq!(at_offset, sliced);
        assert_eq!(at_offset, sample());
    }

    #[test]
    fn reserved_byte_is_ignored() {
        let mut bytes = sample().encode().to_vec();
        bytes[offsets::RESERVED] = 0x7F;
        assert_eq!(PlayerLocationRecord::decode(&bytes, 0), Ok(sample()));
    }

    #[test]
    fn short_buffer_is_truncated() {
        let bytes = sample().encode();

        assert_eq!(
            PlayerLocationRecord::decode(&bytes[..21], 0),
            Err(DecodeError::Truncated {
                offset: 0,
                needed: 22,
                available: 21,
            })
        );
        assert_eq!(
            PlayerLocationRecord::decode(&bytes, 1),
            Err(DecodeError::Truncated {
                offset: 1,
                needed: 22,
                available: 21,
            })
        );
        assert_eq!(
            PlayerLocationRecord::decode(&bytes, 40),
            Err(DecodeError::Truncated {
                offset: 40,
                needed: 22,
                available: 0,
            })
        );
        assert!(matches!(
            PlayerLocationRecord::decode(&bytes, usize::MAX),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn unknown_movement_type_is_rejected() {
        let mut bytes = sample().encode().to_vec();
        bytes[offsets::MOVEMENT_TYPE] = 3;
        assert_eq!(
            PlayerLocationRecord::decode(&bytes, 0),
            Err(DecodeError::UnknownMovementType(3))
        );

        bytes[offsets::MOVEMENT_TYPE] = 0xFF;
        assert_eq!(
            PlayerLocationRecord::decode(&bytes, 0),
            Err(DecodeError::UnknownMovementType(0xFF))
        );
    }

    #[test]
    fn running_uses_run_velocity() {
        let record = PlayerLocationRecord::from_player_state(&test_player(MovementType::Running));

        assert_eq!(record.player_id, 42);
        assert_eq!((record.x, record.y), (12.5, -3.0));
        assert_eq!(record.movement_direction, 5);
        assert_eq!(record.movement_type, MovementType::Running);
        assert_eq!(record.movement_speed, 2.0);
    }

    #[test]
    fn walking_and_standing_use_walk_velocity() {
        let walking = PlayerLocationRecord::from_player_state(&test_player(MovementType::Walking));
        assert_eq!(walking.movement_speed, 1.0);

        let standing = PlayerLocationRecord::from_player_state(&test_player(MovementType::Standing));
        assert_eq!(standing.movement_type, MovementType::Standing);
        assert_eq!(standing.movement_speed, 1.0);
    }

    #[test]
    fn movement_type_serializes_snake_case() {
        let json = serde_json::to_string(&MovementType::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }
}
