//! Coupon redemption.

use chrono::{DateTime, Utc};
use coupon_common::{CouponError, CouponStatus, Locale, NoticeCode};
use std::sync::Arc;

use super::hasher::PassCodeHasher;
use super::request::RedeemCommand;
use crate::store::{CouponStore, MarkUsed};

/// Successful outcomes of a redemption attempt (all reported as HTTP 200)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// The coupon is now used
    Redeemed { number: u32 },
    /// The coupon was used before; nothing changed
    AlreadyUsed,
    /// The coupon is past its expiry; nothing changed
    Expired,
}

impl Redemption {
    pub fn notice(&self) -> NoticeCode {
        match self {
            Self::Redeemed { .. } => NoticeCode::Redeemed,
            Self::AlreadyUsed => NoticeCode::AlreadyUsed,
            Self::Expired => NoticeCode::Expired,
        }
    }

    /// Response message in `locale`; only a redemption mentions the usage count
    pub fn message(&self, locale: Locale) -> String {
        let number = match self {
            Self::Redeemed { number } => *number,
            Self::AlreadyUsed | Self::Expired => 0,
        };
        self.notice().render(locale, number)
    }
}

/// Coupon redeemer service
pub struct CouponRedeemer {
    hasher: Arc<PassCodeHasher>,
}

impl CouponRedeemer {
    pub fn new(hasher: Arc<PassCodeHasher>) -> Self {
        Self { hasher }
    }

    pub async fn redeem<S>(&self, store: &S, cmd: &RedeemCommand) -> Result<Redemption, CouponError>
    where
        S: CouponStore + Sync,
    {
        self.redeem_at(store, cmd, Utc::now()).await
    }

    /// Redeem as of `now`
    pub async fn redeem_at<S>(
        &self,
        store: &S,
        cmd: &RedeemCommand,
        now: DateTime<Utc>,
    ) -> Result<Redemption, CouponError>
    where
        S: CouponStore + Sync,
    {
        let serial = &cmd.serial_number;

        let record = store
            .get(serial)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, serial_number = %serial, "Failed to load coupon");
                CouponError::RedeemFailed(e.to_string())
            })?
            .ok_or(CouponError::UnknownSerialNumber)?;

        if !self.hasher.verify(serial, &cmd.pass_code, &record.hash) {
            tracing::debug!(serial_number = %serial, "Passcode mismatch");
            return Err(CouponError::IncorrectPassCode);
        }

        match record.status_at(now) {
            CouponStatus::Redeemed => return Ok(Redemption::AlreadyUsed),
            CouponStatus::Expired => return Ok(Redemption::Expired),
            CouponStatus::Active => {}
        }

        let outcome = store.mark_used(serial, now).await.map_err(|e| {
            tracing::error!(error = %e, serial_number = %serial, "Failed to mark coupon used");
            CouponError::RedeemFailed(e.to_string())
        })?;

        match outcome {
            MarkUsed::Marked(updated) => {
                tracing::info!(serial_number = %serial, number = updated.number, "Coupon redeemed");
                Ok(Redemption::Redeemed {
                    number: updated.number,
                })
            }
            MarkUsed::AlreadyUsed => {
                tracing::warn!(serial_number = %serial, "Coupon redeemed concurrently");
                Ok(Redemption::AlreadyUsed)
            }
            MarkUsed::Missing => Err(CouponError::UnknownSerialNumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Salt;
    use crate::store::{FaultyStore, MemoryStore};
    use chrono::TimeZone;
    use coupon_common::{CouponRecord, PassCode, SerialNumber};
    use tokio_test::{assert_err, assert_ok};

    struct Fixture {
        store: MemoryStore,
        hasher: Arc<PassCodeHasher>,
        redeemer: CouponRedeemer,
    }

    fn fixture() -> Fixture {
        let hasher = Arc::new(PassCodeHasher::new(Salt::new("pepper")));
        Fixture {
            store: MemoryStore::new(),
            redeemer: CouponRedeemer::new(hasher.clone()),
            hasher,
        }
    }

    fn command(serial: &str, pass_code: &str) -> RedeemCommand {
        RedeemCommand {
            serial_number: SerialNumber::parse(serial).unwrap(),
            pass_code: PassCode::parse(pass_code).unwrap(),
        }
    }

    impl Fixture {
        async fn seed(&self, cmd: &RedeemCommand, number: u32, expired_at: Option<i64>) {
            let hash = self.hasher.hash(&cmd.serial_number, &cmd.pass_code);
            self.store
                .put(&cmd.serial_number, CouponRecord::new(hash, number, expired_at))
                .await;
        }
    }

    #[tokio::test]
    async fn test_redeem_once_then_already_used() {
        let fx = fixture();
        let cmd = command("123456789012", "12345");
        fx.seed(&cmd, 7, None).await;

        let first = assert_ok!(fx.redeemer.redeem(&fx.store, &cmd).await);
        assert_eq!(first, Redemption::Redeemed { number: 7 });
        let used = fx.store.get(&cmd.serial_number).await.unwrap().unwrap();
        assert!(used.used_at.is_some());

        let second = assert_ok!(fx.redeemer.redeem(&fx.store, &cmd).await);
        assert_eq!(second, Redemption::AlreadyUsed);
        let after = fx.store.get(&cmd.serial_number).await.unwrap().unwrap();
        assert_eq!(after, used);
    }

    #[tokio::test]
    async fn test_unknown_serial() {
        let fx = fixture();
        let result = fx.redeemer.redeem(&fx.store, &command("000000000000", "12345")).await;
        assert!(matches!(result, Err(CouponError::UnknownSerialNumber)));
    }

    #[tokio::test]
    async fn test_wrong_pass_code_leaves_record() {
        let fx = fixture();
        let good = command("123456789012", "12345");
        fx.seed(&good, 1, None).await;

        let result = fx.redeemer.redeem(&fx.store, &command("123456789012", "12346")).await;
        assert!(matches!(result, Err(CouponError::IncorrectPassCode)));

        let record = fx.store.get(&good.serial_number).await.unwrap().unwrap();
        assert!(record.used_at.is_none());
    }

    #[tokio::test]
    async fn test_expired_is_not_marked() {
        let fx = fixture();
        let cmd = command("123456789012", "12345");
        let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        fx.seed(&cmd, 2, Some(expires.timestamp_millis())).await;

        let later = Utc.with_ymd_and_hms(2030, 1, 2, 0, 0, 0).unwrap();
        let outcome = assert_ok!(fx.redeemer.redeem_at(&fx.store, &cmd, later).await);
        assert_eq!(outcome, Redemption::Expired);

        let record = fx.store.get(&cmd.serial_number).await.unwrap().unwrap();
        assert!(record.used_at.is_none());

        // Still redeemable before the expiry instant
        let earlier = Utc.with_ymd_and_hms(2029, 12, 31, 12, 0, 0).unwrap();
        let outcome = assert_ok!(fx.redeemer.redeem_at(&fx.store, &cmd, earlier).await);
        assert_eq!(outcome, Redemption::Redeemed { number: 2 });
    }

    #[tokio::test]
    async fn test_used_wins_over_expired() {
        let fx = fixture();
        let cmd = command("123456789012", "12345");
        let hash = fx.hasher.hash(&cmd.serial_number, &cmd.pass_code);
        let mut record = CouponRecord::new(hash, 1, Some(0));
        record.used_at = Some(Utc::now());
        fx.store.put(&cmd.serial_number, record).await;

        let outcome = assert_ok!(fx.redeemer.redeem(&fx.store, &cmd).await);
        assert_eq!(outcome, Redemption::AlreadyUsed);
    }

    /// Store holding an active coupon for `cmd`
    fn faulty_with(fx: &Fixture, cmd: &RedeemCommand) -> FaultyStore {
        let hash = fx.hasher.hash(&cmd.serial_number, &cmd.pass_code);
        FaultyStore::new().with_record(CouponRecord::new(hash, 6, None))
    }

    #[tokio::test]
    async fn test_lost_race_reports_already_used() {
        let fx = fixture();
        let cmd = command("123456789012", "12345");
        let store = faulty_with(&fx, &cmd).marking(MarkUsed::AlreadyUsed);

        let outcome = assert_ok!(fx.redeemer.redeem(&store, &cmd).await);
        assert_eq!(outcome, Redemption::AlreadyUsed);
    }

    #[tokio::test]
    async fn test_record_deleted_before_write() {
        let fx = fixture();
        let cmd = command("123456789012", "12345");
        let store = faulty_with(&fx, &cmd).marking(MarkUsed::Missing);

        let err = assert_err!(fx.redeemer.redeem(&store, &cmd).await);
        assert!(matches!(err, CouponError::UnknownSerialNumber));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_store_errors_are_redeem_failed() {
        let fx = fixture();
        let cmd = command("123456789012", "12345");

        for store in [
            faulty_with(&fx, &cmd).failing_reads(),
            faulty_with(&fx, &cmd).failing_writes(),
        ] {
            let err = assert_err!(fx.redeemer.redeem(&store, &cmd).await);
            assert!(matches!(err, CouponError::RedeemFailed(_)), "{:?}", err);
            assert_eq!(err.status_code(), 500);
        }

        // A failed write is only reported once the passcode checks out
        let wrong = command("123456789012", "99999");
        let store = faulty_with(&fx, &cmd).failing_writes();
        let err = assert_err!(fx.redeemer.redeem(&store, &wrong).await);
        assert!(matches!(err, CouponError::IncorrectPassCode));
    }

    #[test]
    fn test_notice_codes() {
        assert_eq!(Redemption::Redeemed { number: 1 }.notice(), NoticeCode::Redeemed);
        assert_eq!(Redemption::AlreadyUsed.notice(), NoticeCode::AlreadyUsed);
        assert_eq!(Redemption::Expired.notice(), NoticeCode::Expired);
        assert_eq!(Redemption::Redeemed { number: 4 }.message(Locale::Zh), "4本券已成功使用");
        assert_eq!(Redemption::AlreadyUsed.message(Locale::En), "This coupon has already been used");
    }
}
