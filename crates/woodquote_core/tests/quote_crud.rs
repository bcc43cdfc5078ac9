use chrono::NaiveDateTime;
use std::fs;
use uuid::Uuid;
use woodquote_core::model::quote::TIMESTAMP_FORMAT;
use woodquote_core::{
    compute, CsvQuoteRepository, PricingInputs, ProductType, QuoteDraft, QuoteRepository, Region,
    RepoError, Unit,
};

fn draft(name: &str, gross_price: f64) -> QuoteDraft {
    QuoteDraft::new(
        name,
        Region::MG,
        PricingInputs {
            gross_price,
            wood_cost: gross_price * 0.4,
            product_type: ProductType::Tora,
            services_cost: 120.0,
            distance_km: 240.0,
            price_per_km: 2.5,
            unit: Unit::Ton,
            fixed_freight_per_unit: 0.0,
            purchase_commission: 35.0,
            sale_commission: 45.0,
        },
    )
}

fn repo_in(dir: &tempfile::TempDir) -> CsvQuoteRepository {
    CsvQuoteRepository::new(dir.path().join("quotes.csv"))
}

#[test]
fn load_all_on_missing_file_is_empty_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    assert!(repo.load_all().unwrap().is_empty());
    assert!(!repo.path().exists());
}

#[test]
fn append_round_trips_inputs_and_derived_fields() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    let input = draft("Fazenda Boa Vista", 3200.0);

    let created = repo.append(&input).unwrap();
    let loaded = repo.load_all().unwrap();

    assert_eq!(loaded.len(), 1);
    let record = &loaded[0];
    assert_eq!(record, &created);
    assert_eq!(record.to_draft(), input);
    assert_eq!(record.breakdown, compute(&input.inputs));
    assert!(NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).is_ok());
}

#[test]
fn append_preserves_order_and_assigns_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    let first = repo.append(&draft("a", 100.0)).unwrap();
    let second = repo.append(&draft("b", 200.0)).unwrap();

    let loaded = repo.load_all().unwrap();
    assert_eq!(
        loaded.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    assert_ne!(first.id, second.id);
}

#[test]
fn load_all_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.append(&draft("a", 100.0)).unwrap();
    repo.append(&draft("b", 250.0)).unwrap();

    assert_eq!(repo.load_all().unwrap(), repo.load_all().unwrap());
}

#[test]
fn update_at_reprices_and_keeps_timestamp_and_id() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    let original = repo.append(&draft("lote", 1000.0)).unwrap();

    let mut edited = draft("lote revisado", 1500.0);
    edited.region = Region::SP;
    edited.inputs.unit = Unit::M3;
    edited.inputs.fixed_freight_per_unit = 12.0;

    assert!(repo.update_at(0, &edited).unwrap());

    let loaded = repo.load_all().unwrap();
    let record = &loaded[0];
    assert_eq!(record.id, original.id);
    assert_eq!(record.timestamp, original.timestamp);
    assert_eq!(record.to_draft(), edited);
    assert_eq!(record.breakdown, compute(&edited.inputs));
    assert_eq!(record.breakdown.transport, 12.0);
}

#[test]
fn delete_at_shifts_later_records_down() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.append(&draft("zero", 100.0)).unwrap();
    repo.append(&draft("one", 200.0)).unwrap();
    let last = repo.append(&draft("two", 300.0)).unwrap();

    assert!(repo.delete_at(1).unwrap());

    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1], last);
    assert_eq!(loaded[0].name, "zero");
}

#[test]
fn out_of_bounds_update_and_delete_leave_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.append(&draft("a", 100.0)).unwrap();
    repo.append(&draft("b", 200.0)).unwrap();
    let before = fs::read(repo.path()).unwrap();

    assert!(!repo.update_at(5, &draft("ghost", 1.0)).unwrap());
    assert!(!repo.delete_at(5).unwrap());
    assert!(!repo.delete_at(2).unwrap());

    assert_eq!(fs::read(repo.path()).unwrap(), before);
}

#[test]
fn index_mutations_on_missing_file_do_not_create_it() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    assert!(!repo.update_at(0, &draft("ghost", 1.0)).unwrap());
    assert!(!repo.delete_at(0).unwrap());
    assert!(!repo.path().exists());
}

#[test]
fn deleting_the_last_record_leaves_a_header_only_table() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.append(&draft("only", 100.0)).unwrap();

    assert!(repo.delete_at(0).unwrap());

    assert!(repo.load_all().unwrap().is_empty());
    let contents = fs::read_to_string(repo.path()).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("timestamp,name,region,unit,product_type,"));
}

#[test]
fn id_addressed_operations_survive_reindexing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.append(&draft("first", 100.0)).unwrap();
    let target = repo.append(&draft("second", 200.0)).unwrap();
    repo.delete_at(0).unwrap();

    let found = repo.get(target.id).unwrap().expect("still present");
    assert_eq!(found, target);

    let updated = repo.update(target.id, &draft("second v2", 400.0)).unwrap();
    assert_eq!(updated.id, target.id);
    assert_eq!(updated.timestamp, target.timestamp);
    assert_eq!(updated.name, "second v2");

    repo.delete(target.id).unwrap();
    assert!(repo.get(target.id).unwrap().is_none());
}

#[test]
fn id_addressed_operations_report_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.append(&draft("a", 100.0)).unwrap();
    let missing = Uuid::new_v4();

    let update_err = repo.update(missing, &draft("x", 1.0)).unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(id) if id == missing));
    let delete_err = repo.delete(missing).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn repository_stores_negative_inputs_without_validation() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    let mut input = draft("", 100.0);
    input.inputs.wood_cost = -50.0;

    let created = repo.append(&input).unwrap();

    assert_eq!(created.name, "");
    assert_eq!(created.breakdown, compute(&input.inputs));
}
