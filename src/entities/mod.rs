pub mod booking;
pub mod movie;
pub mod sea_orm_active_enums;
pub mod theater;
pub mod user;

use sea_orm::entity::prelude::{DateTime, DateTimeUtc, DbErr};

/// Current UTC wall-clock time in the representation stored in `updatedAt`.
pub(crate) fn now() -> Result<DateTime, DbErr> {
    let ts = jiff::Timestamp::now();
    DateTimeUtc::from_timestamp(ts.as_second(), ts.subsec_nanosecond() as u32)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| DbErr::Custom(format!("timestamp {ts} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_tracks_the_system_clock() {
        let expected = jiff::Timestamp::now().as_second();

        let now = now().unwrap();

        assert!((now.and_utc().timestamp() - expected).abs() <= 1);
    }
}
