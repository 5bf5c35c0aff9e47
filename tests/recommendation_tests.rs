mod common;

use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;

use common::{asset, cautious_snapshot, mixed_catalog, request, HarnessBuilder};
use portfolio_advisor::engine::simulator::MAX_SIMULATION_MONTHS;
use portfolio_advisor::errors::AppError;
use portfolio_advisor::models::{
    ApprovalStatus, AssetClass, Concentration, Objective, RiskProfile, MAX_AMOUNT,
};

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_conservative_client_end_to_end() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();

    let portfolio = h.service.generate(request(h.client_id, 10_000)).await.unwrap();

    let codes: Vec<_> = portfolio.items.iter().map(|i| i.asset_code.as_str()).collect();
    assert_eq!(codes, vec!["CDB-A", "CDB-B", "FUND-C"]);

    let pcts: Vec<_> = portfolio.items.iter().map(|i| i.percentage).collect();
    assert_eq!(pcts, vec![Decimal::from(60), Decimal::from(20), Decimal::from(20)]);

    let values: Vec<_> = portfolio.items.iter().map(|i| i.value).collect();
    assert_eq!(values, vec![Decimal::from(6_000), Decimal::from(2_000), Decimal::from(2_000)]);

    assert_eq!(portfolio.expected_yield, Decimal::from(7));
    assert_eq!(portfolio.adequacy_score, Decimal::ONE);
    assert_eq!(portfolio.approval, ApprovalStatus::Pending);
    assert_eq!(portfolio.objective, Objective::Retirement);
    assert_eq!(portfolio.horizon_months, 120);

    // Header, items and the success audit entry were stored together.
    assert_eq!(h.store.portfolio_count(), 1);
    let audit = h.store.audit_entries();
    assert_eq!(audit.len(), 1);
    assert!(audit[0].success);
    assert_eq!(audit[0].portfolio_id, Some(portfolio.id));
    assert_eq!(audit[0].algorithm_version, "1.0");
}

#[tokio::test]
async fn test_request_overrides_objective_and_horizon() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();

    let mut req = request(h.client_id, 5_000);
    req.objective = Some(Objective::ShortTerm);
    req.horizon_months = Some(6);

    let portfolio = h.service.generate(req).await.unwrap();
    assert_eq!(portfolio.objective, Objective::ShortTerm);
    assert_eq!(portfolio.horizon_months, 6);
    assert!(portfolio.rationale.contains("6 months"));
}

#[tokio::test]
async fn test_allocation_never_exceeds_100_percent() {
    for tier in [RiskProfile::Conservative, RiskProfile::Moderate, RiskProfile::Aggressive] {
        let h = HarnessBuilder::new(tier)
            .catalog(mixed_catalog())
            .snapshot(cautious_snapshot())
            .build();

        let mut req = request(h.client_id, 3_333);
        req.consider_macro = true;
        let portfolio = h.service.generate(req).await.unwrap();

        let total = portfolio.allocated_percentage();
        assert!(total > Decimal::ZERO, "tier {tier}");
        assert!(total <= Decimal::new(10_002, 2), "tier {tier} allocated {total}");
        assert!(portfolio.items.iter().all(|i| i.percentage >= Decimal::ZERO));
    }
}

#[tokio::test]
async fn test_macro_adjustment_applied_for_moderate() {
    let h = HarnessBuilder::new(RiskProfile::Moderate)
        .catalog(mixed_catalog())
        .snapshot(cautious_snapshot())
        .build();

    let mut req = request(h.client_id, 10_000);
    req.consider_macro = true;
    let portfolio = h.service.generate(req).await.unwrap();

    // Base 50/30/20 becomes 60/24/16 under a cautious high-rate scenario.
    assert_eq!(portfolio.class_percentage(AssetClass::FixedIncome), Decimal::from(60));
    assert_eq!(portfolio.class_percentage(AssetClass::Equity), Decimal::from(24));
    assert_eq!(portfolio.class_percentage(AssetClass::Fund), Decimal::from(16));
}

#[tokio::test]
async fn test_macro_timeout_degrades_to_base_targets() {
    let h = HarnessBuilder::new(RiskProfile::Moderate)
        .catalog(mixed_catalog())
        .snapshot(cautious_snapshot())
        .slow_macro(Duration::from_millis(300), Duration::from_millis(20))
        .build();

    let mut req = request(h.client_id, 10_000);
    req.consider_macro = true;
    let portfolio = h.service.generate(req).await.unwrap();

    assert_eq!(portfolio.class_percentage(AssetClass::FixedIncome), Decimal::from(50));
    assert_eq!(portfolio.class_percentage(AssetClass::Equity), Decimal::from(30));
}

#[tokio::test]
async fn test_macro_failure_degrades_to_base_targets() {
    // No snapshot configured: the provider errors on every call.
    let h = HarnessBuilder::new(RiskProfile::Moderate).catalog(mixed_catalog()).build();

    let mut req = request(h.client_id, 10_000);
    req.consider_macro = true;
    let portfolio = h.service.generate(req).await.unwrap();

    assert_eq!(portfolio.class_percentage(AssetClass::FixedIncome), Decimal::from(50));
}

#[tokio::test]
async fn test_allowlist_restricts_candidates() {
    let catalog = mixed_catalog();
    let only_fund = catalog.iter().find(|a| a.code == "FUND-C").unwrap().id;
    let h = HarnessBuilder::new(RiskProfile::Conservative).catalog(catalog).build();

    let mut req = request(h.client_id, 10_000);
    req.asset_ids = vec![only_fund];
    let portfolio = h.service.generate(req).await.unwrap();

    assert_eq!(portfolio.items.len(), 1);
    assert_eq!(portfolio.items[0].asset_code, "FUND-C");
    assert_eq!(portfolio.items[0].priority, 1);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_client_is_not_found_and_audited() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();

    let err = h.service.generate(request(Uuid::new_v4(), 1_000)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let audit = h.store.audit_entries();
    assert_eq!(audit.len(), 1);
    assert!(!audit[0].success);
    assert!(audit[0].error.is_some());
}

#[tokio::test]
async fn test_non_positive_amount_rejected() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();

    let err = h.service.generate(request(h.client_id, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert_eq!(h.store.portfolio_count(), 0);
}

#[tokio::test]
async fn test_oversized_amount_rejected_and_audited() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let mut req = request(h.client_id, 1_000);
    req.amount = Decimal::MAX;

    let err = h.service.generate(req).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert_eq!(h.store.portfolio_count(), 0);

    let audit = h.store.audit_entries();
    assert_eq!(audit.len(), 1);
    assert!(!audit[0].success);
}

#[tokio::test]
async fn test_largest_storable_amount_is_accepted() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let mut req = request(h.client_id, 1_000);
    req.amount = MAX_AMOUNT;

    let portfolio = h.service.generate(req).await.unwrap();
    assert_eq!(portfolio.total_value, MAX_AMOUNT);
}

#[tokio::test]
async fn test_empty_candidate_set_rejected() {
    let mut expensive = asset("CDB-X", AssetClass::FixedIncome, RiskProfile::Conservative, 9, 1, 0);
    expensive.min_investment = Decimal::from(1_000_000);
    let h = HarnessBuilder::new(RiskProfile::Conservative).catalog(vec![expensive]).build();

    let err = h.service.generate(request(h.client_id, 1_000)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_catalog_outage_is_upstream_unavailable() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).failing_catalog().build();

    let err = h.service.generate(request(h.client_id, 1_000)).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    assert_eq!(h.store.audit_entries().len(), 1);
}

#[tokio::test]
async fn test_persistence_failure_rolls_back_and_audits() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    h.store.fail_saves.store(true, std::sync::atomic::Ordering::SeqCst);

    let err = h.service.generate(request(h.client_id, 10_000)).await.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));

    assert_eq!(h.store.portfolio_count(), 0);
    let audit = h.store.audit_entries();
    assert_eq!(audit.len(), 1);
    assert!(!audit[0].success);
    assert_eq!(audit[0].portfolio_id, None);
    assert!(audit[0].error.as_deref().unwrap_or_default().contains("commit"));
}

// ---------------------------------------------------------------------------
// Stored portfolios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_is_idempotent() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let created = h.service.generate(request(h.client_id, 10_000)).await.unwrap();

    let first = h.service.get(created.id).await.unwrap();
    let second = h.service.get(created.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, created);
}

#[tokio::test]
async fn test_get_unknown_portfolio() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let err = h.service.get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_approval_can_be_overwritten() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let created = h.service.generate(request(h.client_id, 10_000)).await.unwrap();

    let approved = h.service.approve(created.id, true).await.unwrap();
    assert_eq!(approved.approval, ApprovalStatus::Approved);
    assert!(approved.approved_at.is_some());

    let rejected = h.service.approve(created.id, false).await.unwrap();
    assert_eq!(rejected.approval, ApprovalStatus::Rejected);
    assert_eq!(rejected.items, created.items);

    let err = h.service.approve(Uuid::new_v4(), true).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_simulation_of_stored_portfolio() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let created = h.service.generate(request(h.client_id, 10_000)).await.unwrap();

    let series = h.service.simulate(created.id, 12).await.unwrap();
    assert_eq!(series.projections.len(), 12);
    assert_eq!(series.initial_value, Decimal::from(10_000));
    assert!(series.final_value > series.initial_value);

    let err = h.service.simulate(created.id, 0).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let err = h.service.simulate(Uuid::new_v4(), 12).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_simulation_rejects_horizon_beyond_maximum() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let created = h.service.generate(request(h.client_id, 10_000)).await.unwrap();

    let err = h.service.simulate(created.id, 10_000).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let series = h.service.simulate(created.id, MAX_SIMULATION_MONTHS).await.unwrap();
    assert_eq!(series.projections.len(), MAX_SIMULATION_MONTHS as usize);
}

#[tokio::test]
async fn test_diversification_of_stored_portfolio() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    let created = h.service.generate(request(h.client_id, 10_000)).await.unwrap();

    let report = h.service.diversification(created.id).await.unwrap();
    assert_eq!(report.item_count, 3);
    assert_eq!(report.share_of(AssetClass::FixedIncome), Decimal::from(80));
    assert_eq!(report.max_item_percentage, Decimal::from(60));
    assert_eq!(report.concentration, Concentration::High);
}

#[tokio::test]
async fn test_history_lists_client_portfolios() {
    let h = HarnessBuilder::new(RiskProfile::Conservative).build();
    h.service.generate(request(h.client_id, 1_000)).await.unwrap();
    h.service.generate(request(h.client_id, 2_000)).await.unwrap();

    let history = h.service.list_for_client(h.client_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].generated_at >= history[1].generated_at);

    let err = h.service.list_for_client(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
