#![allow(non_snake_case)]

use crate::stp_seconds;
use crate::tick::{StpTimer, TICK_INCREMENT};

#[test]
fn StpTimer_Inactive_NeverExpires() {
    // Arrange
    let mut timer = StpTimer::new();

    // Act & Assert
    for _ in 0..10 {
        assert!(!timer.expired(stp_seconds!(1)));
    }
    assert_eq!(timer.value(), 0);
}

#[test]
fn StpTimer_StartedAtZero_ExpiresAfterLimitTicks() {
    // Arrange
    let mut timer = StpTimer::new();
    timer.start(0);

    // Act & Assert
    for _ in 0..14 {
        assert!(!timer.expired(stp_seconds!(15)));
    }
    assert_eq!(timer.value(), 14 * TICK_INCREMENT);
    assert!(timer.expired(stp_seconds!(15)));
    assert!(!timer.is_active());
    assert!(!timer.expired(stp_seconds!(15)));
}

#[test]
fn StpTimer_StartedWithElapsedValue_ExpiresSooner() {
    // Arrange
    let mut timer = StpTimer::new();
    timer.start(stp_seconds!(18));

    // Act & Assert
    assert!(!timer.expired(stp_seconds!(20)));
    assert!(timer.expired(stp_seconds!(20)));
}

#[test]
fn StpTimer_StartedAtLimit_ExpiresOnNextTick() {
    // Arrange
    let mut timer = StpTimer::new();
    timer.start(stp_seconds!(20));

    // Act & Assert
    assert!(timer.expired(stp_seconds!(20)));
}

#[test]
fn StpTimer_Stop_ClearsValue() {
    // Arrange
    let mut timer = StpTimer::new();
    timer.start(stp_seconds!(3));

    // Act
    timer.stop();

    // Assert
    assert!(!timer.is_active());
    assert_eq!(timer.value(), 0);
}

#[test]
fn StpTimer_Restart_CountsFromNewValue() {
    // Arrange
    let mut timer = StpTimer::new();
    timer.start(0);
    timer.expired(stp_seconds!(2));

    // Act
    timer.start(0);

    // Assert
    assert!(!timer.expired(stp_seconds!(2)));
    assert!(timer.expired(stp_seconds!(2)));
}
