//! Motion derived from two successive position reports.
//!
//! Every function here is pure. `delta` is the time elapsed between the two
//! reports in whatever unit the client uses consistently (milliseconds for
//! the bundled clients); velocities and accelerations are per that unit.
//!
//! A `delta` that is zero, negative or non-finite is rejected instead of
//! producing infinities that would end up in broadcast state. `advance` also
//! rejects finite inputs whose derived motion overflows.

use super::{
    entity::{ClientState, Velocity},
    error::KinematicsError,
    value_object::Position,
};

fn check_delta(delta: f64) -> Result<(), KinematicsError> {
    if delta.is_finite() && delta > 0.0 {
        Ok(())
    } else {
        Err(KinematicsError::NonPositiveDelta(delta))
    }
}

/// Displacement per unit of time between `prev` and `curr`.
pub fn velocity(prev: Position, curr: Position, delta: f64) -> Result<Velocity, KinematicsError> {
    check_delta(delta)?;
    Ok(Velocity {
        vx: (curr.x - prev.x) / delta,
        vy: (curr.y - prev.y) / delta,
    })
}

/// Magnitude of a velocity.
pub fn speed(velocity: Velocity) -> f64 {
    velocity.vx.hypot(velocity.vy)
}

/// Direction of travel from `prev` to `curr` in radians.
///
/// Zero displacement has no direction; it is reported as `0`.
pub fn heading(prev: Position, curr: Position) -> f64 {
    let dx = curr.x - prev.x;
    let dy = curr.y - prev.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx)
}

/// Change of speed per unit of time.
pub fn acceleration(previous_speed: f64, speed: f64, delta: f64) -> Result<f64, KinematicsError> {
    check_delta(delta)?;
    Ok((speed - previous_speed) / delta)
}

/// Compute the next state of a client that moved to `curr` after `delta`.
pub fn advance(prev: &ClientState, curr: Position, delta: f64) -> Result<ClientState, KinematicsError> {
    if !curr.is_finite() {
        return Err(KinematicsError::NonFinitePosition {
            x: curr.x,
            y: curr.y,
        });
    }

    let velocity = velocity(prev.position, curr, delta)?;
    let speed = speed(velocity);
    let acceleration = acceleration(prev.speed, speed, delta)?;

    // A tiny delta or a huge jump can overflow even with finite inputs.
    if !(velocity.vx.is_finite() && velocity.vy.is_finite() && speed.is_finite() && acceleration.is_finite()) {
        return Err(KinematicsError::NonFiniteState {
            vx: velocity.vx,
            vy: velocity.vy,
            speed,
            acceleration,
        });
    }

    Ok(ClientState {
        position: curr,
        velocity,
        speed,
        heading: heading(prev.position, curr),
        acceleration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_advance_from_origin() {
        // テスト項目: 原点から (10, 0) へ delta=100 で移動したときの運動量
        // given (前提条件):
        let prev = ClientState::at_rest();

        // when (操作):
        let next = advance(&prev, Position::new(10.0, 0.0), 100.0).unwrap();

        // then (期待する結果):
        assert_eq!(next.position, Position::new(10.0, 0.0));
        assert_close(next.velocity.vx, 0.1);
        assert_close(next.velocity.vy, 0.0);
        assert_close(next.speed, 0.1);
        assert_close(next.heading, 0.0);
        assert_close(next.acceleration, 0.001);
    }

    #[test]
    fn test_advance_same_position_twice() {
        // テスト項目: 同じ位置を続けて報告すると速度 0、加速度は -前回速度/delta
        // given (前提条件):
        let moving = advance(&ClientState::at_rest(), Position::new(30.0, 40.0), 10.0).unwrap();
        assert_close(moving.speed, 5.0);

        // when (操作):
        let next = advance(&moving, Position::new(30.0, 40.0), 10.0).unwrap();

        // then (期待する結果):
        assert_eq!(next.velocity, Velocity { vx: 0.0, vy: 0.0 });
        assert_eq!(next.speed, 0.0);
        assert_eq!(next.heading, 0.0);
        assert_close(next.acceleration, (0.0 - 5.0) / 10.0);
    }

    #[test]
    fn test_advance_zero_delta_is_rejected() {
        // テスト項目: delta=0 は拒否される
        // when (操作):
        let result = advance(&ClientState::at_rest(), Position::new(1.0, 1.0), 0.0);

        // then (期待する結果):
        assert_eq!(result, Err(KinematicsError::NonPositiveDelta(0.0)));
    }

    #[test]
    fn test_advance_negative_and_nan_delta_are_rejected() {
        // テスト項目: 負の delta や NaN は拒否される
        let prev = ClientState::at_rest();
        assert!(advance(&prev, Position::new(1.0, 1.0), -5.0).is_err());
        assert!(advance(&prev, Position::new(1.0, 1.0), f64::NAN).is_err());
        assert!(advance(&prev, Position::new(1.0, 1.0), f64::INFINITY).is_err());
    }

    #[test]
    fn test_advance_non_finite_position_is_rejected() {
        // テスト項目: 有限でない座標は拒否される
        // when (操作):
        let result = advance(&ClientState::at_rest(), Position::new(f64::INFINITY, 0.0), 1.0);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(KinematicsError::NonFinitePosition { .. })
        ));
    }

    #[test]
    fn test_heading_zero_displacement_is_zero() {
        // テスト項目: 変位がない場合の向きは 0
        let p = Position::new(-3.0, 7.0);
        assert_eq!(heading(p, p), 0.0);
    }

    #[test]
    fn test_heading_quadrants() {
        // テスト項目: 向きは atan2(dy, dx) に従う
        let o = Position::origin();
        assert_close(heading(o, Position::new(0.0, 1.0)), FRAC_PI_2);
        assert_close(heading(o, Position::new(-1.0, 0.0)), PI);
        assert_close(heading(o, Position::new(0.0, -1.0)), -FRAC_PI_2);
    }

    #[test]
    fn test_speed_is_non_negative() {
        // テスト項目: 速さは常に 0 以上
        for (vx, vy) in [(-3.0, -4.0), (3.0, -4.0), (0.0, 0.0), (-0.5, 0.0)] {
            assert!(speed(Velocity { vx, vy }) >= 0.0);
        }
        assert_close(speed(Velocity { vx: -3.0, vy: -4.0 }), 5.0);
    }

    #[test]
    fn test_advance_is_deterministic() {
        // テスト項目: 同じ入力からは常に同じ結果が得られる
        // given (前提条件):
        let prev = advance(&ClientState::at_rest(), Position::new(3.0, 4.0), 2.0).unwrap();

        // when (操作):
        let a = advance(&prev, Position::new(-8.0, 12.0), 16.0).unwrap();
        let b = advance(&prev, Position::new(-8.0, 12.0), 16.0).unwrap();

        // then (期待する結果):
        assert_eq!(a, b);
    }

    #[test]
    fn test_advance_subnormal_delta_overflow_is_rejected() {
        // テスト項目: delta が極小で速度が無限大になる更新は拒否される
        // when (操作):
        let result = advance(&ClientState::at_rest(), Position::new(1.0, 0.0), 1e-310);

        // then (期待する結果):
        assert!(matches!(result, Err(KinematicsError::NonFiniteState { .. })));
    }

    #[test]
    fn test_advance_huge_jump_overflow_is_rejected() {
        // テスト項目: 有限な座標同士でも差が桁あふれする移動は拒否される
        // given (前提条件):
        let prev = ClientState {
            position: Position::new(1.7e308, 0.0),
            ..ClientState::at_rest()
        };

        // when (操作):
        let result = advance(&prev, Position::new(-1.7e308, 0.0), 1.0);

        // then (期待する結果):
        match result {
            Err(KinematicsError::NonFiniteState { vx, speed, acceleration, .. }) => {
                assert_eq!(vx, f64::NEG_INFINITY);
                assert_eq!(speed, f64::INFINITY);
                assert_eq!(acceleration, f64::INFINITY);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_advance_large_but_representable_move_is_accepted() {
        // テスト項目: 大きくても表現できる移動は受け付けられる
        let state = advance(&ClientState::at_rest(), Position::new(1e300, 0.0), 1.0).unwrap();
        assert_eq!(state.velocity.vx, 1e300);
        assert!(state.acceleration.is_finite());
    }
}
