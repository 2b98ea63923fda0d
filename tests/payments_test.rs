mod common;

use anyhow::Result;
use common::all_services;
use prestito::application::AppError;

#[tokio::test]
async fn test_payments_reduce_balance() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "100", "").await?;

        let balance = service.record_payment("john_doe", "20", "first").await?;
        assert_eq!(balance, 80.0);

        let balance = service.record_payment("john_doe", "30.5", "").await?;
        assert_eq!(balance, 49.5);

        let report = service.get_history("john_doe").await?;
        assert_eq!(report.payments.len(), 3);
        assert_eq!(report.total_paid, 50.5);
        assert_eq!(report.current_balance, Some(49.5));
        assert_eq!(report.payments[1].note, "first");
    }
    Ok(())
}

#[tokio::test]
async fn test_overpayment_goes_negative() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "50", "").await?;

        let balance = service.record_payment("john_doe", "75", "").await?;
        assert_eq!(balance, -25.0);

        let report = service.get_history("john_doe").await?;
        assert_eq!(report.current_balance, Some(-25.0));
    }
    Ok(())
}

#[tokio::test]
async fn test_negative_payment_raises_balance() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "100", "").await?;

        let balance = service.record_payment("john_doe", "-10", "loan top-up").await?;
        assert_eq!(balance, 110.0);
    }
    Ok(())
}

#[tokio::test]
async fn test_balance_invariant_over_sequence() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "1000", "").await?;

        let payments = [125.0, 0.0, 300.25, -50.0, 700.0];
        for p in payments {
            service
                .record_payment("john_doe", &p.to_string(), "")
                .await?;
        }

        let report = service.get_history("john_doe").await?;
        let paid: f64 = payments.iter().sum();
        assert_eq!(report.total_paid, paid);
        assert_eq!(report.current_balance, Some(1000.0 - paid));

        // Each entry's balance is the previous balance minus its amount.
        for window in report.payments.windows(2) {
            let expected = window[0].balance.unwrap() - window[1].amount.unwrap();
            assert_eq!(window[1].balance, Some(expected));
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_payment_for_unknown_user_fails_without_side_effect() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "100", "").await?;

        let err = service.record_payment("ghost", "20", "").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref user) if user == "ghost"));

        assert_eq!(service.list_users().await?, vec!["john_doe"]);
        assert_eq!(service.get_history("john_doe").await?.payments.len(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_payment_accepts_raw_display_name() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "100", "").await?;

        let balance = service.record_payment("John Doe", "40", "").await?;
        assert_eq!(balance, 60.0);
    }
    Ok(())
}

#[tokio::test]
async fn test_payment_rejects_missing_or_unparsable_fields() -> Result<()> {
    for (service, _temp) in all_services().await? {
        service.register_user("John Doe", "100", "").await?;

        for (user, amount) in [("", "20"), ("john_doe", ""), ("john_doe", "twenty")] {
            let err = service.record_payment(user, amount, "").await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        assert_eq!(service.get_history("john_doe").await?.payments.len(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_history_for_unknown_user_is_not_found() -> Result<()> {
    for (service, _temp) in all_services().await? {
        let err = service.get_history("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
    Ok(())
}
