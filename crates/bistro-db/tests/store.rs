//! Integration tests for the generic resource store against an in-memory
//! SQLite database.

use bistro_core::{validation, Filters, Food, FoodPatch, Metadata, Sale, FOOD_SORT_SAFELIST, SALE_SORT_SAFELIST};
use bistro_db::{Database, DbConfig, DbError};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn food(title: &str, price: i64, waittime: i64, recipe: &[&str]) -> Food {
    Food {
        title: title.to_string(),
        price,
        waittime,
        recipe: recipe.iter().map(|s| (*s).to_string()).collect(),
        ..Food::default()
    }
}

fn sale(title: &str, description: &str, duration: i64, foodsale: &[&str]) -> Sale {
    Sale {
        title: title.to_string(),
        description: description.to_string(),
        duration,
        foodsale: foodsale.iter().map(|s| (*s).to_string()).collect(),
        ..Sale::default()
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

// =============================================================================
// Insert / Get
// =============================================================================

#[tokio::test]
async fn insert_then_get_round_trips() {
    let db = test_db().await;
    let foods = db.foods();

    let candidate = food("Pasta", 12, 20, &["flour", "egg"]);
    let inserted = foods.insert(candidate.clone()).await.unwrap();

    assert!(inserted.id >= 1);
    assert_eq!(inserted.version, 1);

    let fetched = foods.get(inserted.id).await.unwrap();
    assert_eq!(fetched, inserted);

    // Every caller-supplied field survives unchanged.
    assert_eq!(fetched.title, candidate.title);
    assert_eq!(fetched.price, candidate.price);
    assert_eq!(fetched.waittime, candidate.waittime);
    assert_eq!(fetched.recipe, candidate.recipe);
}

#[tokio::test]
async fn get_rejects_nonpositive_and_unknown_ids() {
    let db = test_db().await;
    let foods = db.foods();

    assert!(matches!(
        foods.get(0).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
    assert!(matches!(
        foods.get(-3).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
    assert!(matches!(
        foods.get(999).await.unwrap_err(),
        DbError::NotFound { entity: "food", id: 999 }
    ));
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let db = test_db().await;
    let foods = db.foods();

    let first = foods.insert(food("A", 1, 1, &["x"])).await.unwrap();
    foods.delete(first.id).await.unwrap();

    let second = foods.insert(food("B", 2, 2, &["y"])).await.unwrap();
    assert!(second.id > first.id);
}

// =============================================================================
// Update / Optimistic Concurrency
// =============================================================================

#[tokio::test]
async fn update_bumps_version_by_one() {
    let db = test_db().await;
    let foods = db.foods();

    let mut inserted = foods.insert(food("Pasta", 12, 20, &["flour", "egg"])).await.unwrap();
    let created_at = inserted.created_at;

    inserted.price = 15;
    let updated = foods.update(inserted).await.unwrap();
    assert_eq!(updated.version, 2);

    let fetched = foods.get(updated.id).await.unwrap();
    assert_eq!(fetched.price, 15);
    assert_eq!(fetched.version, 2);
    assert_eq!(fetched.created_at, created_at);
}

#[tokio::test]
async fn stale_version_gets_edit_conflict_and_retry_succeeds() {
    let db = test_db().await;
    let foods = db.foods();

    let inserted = foods.insert(food("Pasta", 12, 20, &["flour", "egg"])).await.unwrap();

    // Two writers fetch the same snapshot.
    let mut writer_a = inserted.clone();
    let mut writer_b = inserted.clone();

    writer_a.waittime = 25;
    let winner = foods.update(writer_a).await.unwrap();
    assert_eq!(winner.version, 2);

    // The loser observes the conflict; nothing was written for it.
    writer_b.waittime = 30;
    let err = foods.update(writer_b).await.unwrap_err();
    assert!(matches!(err, DbError::EditConflict { entity: "food", .. }));

    let current = foods.get(inserted.id).await.unwrap();
    assert_eq!(current.waittime, 25);
    assert_eq!(current.version, 2);

    // Fetch-modify-retry against the fresh version succeeds.
    let mut retry = current;
    retry.waittime = 30;
    let retried = foods.update(retry).await.unwrap();
    assert_eq!(retried.version, 3);
}

#[tokio::test]
async fn update_of_missing_row_is_a_conflict() {
    let db = test_db().await;

    let mut ghost = food("Ghost", 1, 1, &["x"]);
    ghost.id = 424242;
    ghost.version = 1;

    let err = db.foods().update(ghost).await.unwrap_err();
    assert!(matches!(err, DbError::EditConflict { .. }));
}

#[tokio::test]
async fn patch_merge_then_update_flow() {
    let db = test_db().await;
    let foods = db.foods();

    let inserted = foods.insert(food("Pasta", 12, 20, &["flour", "egg"])).await.unwrap();

    // Caller merges only the supplied fields onto the fetched resource,
    // re-validates, then updates.
    let mut fetched = foods.get(inserted.id).await.unwrap();
    let patch = FoodPatch {
        title: Some("Pasta al forno".to_string()),
        recipe: Some(tags(&["flour", "egg", "cheese"])),
        ..FoodPatch::default()
    };
    patch.apply(&mut fetched);
    validation::validate_food(&fetched).unwrap();

    let updated = foods.update(fetched).await.unwrap();
    assert_eq!(updated.title, "Pasta al forno");
    assert_eq!(updated.price, 12);
    assert_eq!(updated.version, 2);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_is_permanent_and_not_idempotent() {
    let db = test_db().await;
    let foods = db.foods();

    let inserted = foods.insert(food("Pasta", 12, 20, &["flour"])).await.unwrap();

    foods.delete(inserted.id).await.unwrap();
    assert!(matches!(
        foods.get(inserted.id).await.unwrap_err(),
        DbError::NotFound { .. }
    ));

    // Second delete reports NotFound, not success.
    assert!(matches!(
        foods.delete(inserted.id).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
}

// =============================================================================
// GetAll: filtering
// =============================================================================

async fn seed_foods(db: &Database) {
    let foods = db.foods();
    foods.insert(food("Pasta Carbonara", 12, 20, &["spaghetti", "egg", "guanciale"])).await.unwrap();
    foods.insert(food("Pasta Pomodoro", 9, 15, &["spaghetti", "tomato"])).await.unwrap();
    foods.insert(food("Tomato Soup", 6, 10, &["tomato", "cream"])).await.unwrap();
}

#[tokio::test]
async fn empty_filters_return_all_rows() {
    let db = test_db().await;
    seed_foods(&db).await;

    let filters = Filters::new(FOOD_SORT_SAFELIST);
    let (items, metadata) = db.foods().get_all("", &[], &filters).await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(
        metadata,
        Metadata {
            current_page: 1,
            page_size: 20,
            first_page: 1,
            last_page: 1,
            total_records: 3,
        }
    );

    // Default sort is id ascending.
    let ids: Vec<i64> = items.iter().map(|f| f.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn tag_filter_is_containment_not_equality() {
    let db = test_db().await;
    seed_foods(&db).await;
    let foods = db.foods();
    let filters = Filters::new(FOOD_SORT_SAFELIST);

    let (items, _) = foods.get_all("", &tags(&["tomato"]), &filters).await.unwrap();
    assert_eq!(items.len(), 2);

    // Superset match: both listed tags must be present.
    let (items, _) = foods
        .get_all("", &tags(&["spaghetti", "tomato"]), &filters)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Pasta Pomodoro");

    let (items, metadata) = foods.get_all("", &tags(&["truffle"]), &filters).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(metadata, Metadata::default());
}

#[tokio::test]
async fn title_filter_matches_all_tokens_in_any_order() {
    let db = test_db().await;
    seed_foods(&db).await;
    let foods = db.foods();
    let filters = Filters::new(FOOD_SORT_SAFELIST);

    let (items, _) = foods.get_all("pasta", &[], &filters).await.unwrap();
    assert_eq!(items.len(), 2);

    // Token order doesn't matter; both tokens are required.
    let (items, _) = foods.get_all("pomodoro pasta", &[], &filters).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Pasta Pomodoro");

    let (items, _) = foods.get_all("pasta truffle", &[], &filters).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn title_and_tag_filters_combine_with_and() {
    let db = test_db().await;
    seed_foods(&db).await;

    let filters = Filters::new(FOOD_SORT_SAFELIST);
    let (items, _) = db
        .foods()
        .get_all("pasta", &tags(&["tomato"]), &filters)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Pasta Pomodoro");
}

#[tokio::test]
async fn hostile_title_input_is_inert() {
    let db = test_db().await;
    seed_foods(&db).await;

    // FTS5 operator syntax in the query must not error or match everything;
    // it tokenizes to plain terms ("pasta", "carbonara").
    let filters = Filters::new(FOOD_SORT_SAFELIST);
    let (items, _) = db
        .foods()
        .get_all("pasta\" (carbonara*)", &[], &filters)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Pasta Carbonara");
}

// =============================================================================
// GetAll: sorting and pagination
// =============================================================================

#[tokio::test]
async fn sort_column_with_duplicates_breaks_ties_by_id() {
    let db = test_db().await;
    let foods = db.foods();

    let a = foods.insert(food("A", 10, 5, &["x"])).await.unwrap();
    let b = foods.insert(food("B", 10, 5, &["x"])).await.unwrap();
    let c = foods.insert(food("C", 7, 5, &["x"])).await.unwrap();

    let filters = Filters::new(FOOD_SORT_SAFELIST).sort("price");
    let (items, _) = foods.get_all("", &[], &filters).await.unwrap();
    let ids: Vec<i64> = items.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);

    let filters = Filters::new(FOOD_SORT_SAFELIST).sort("-price");
    let (items, _) = foods.get_all("", &[], &filters).await.unwrap();
    let ids: Vec<i64> = items.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn pagination_slices_deterministically() {
    let db = test_db().await;
    let foods = db.foods();
    for i in 0..5 {
        foods
            .insert(food(&format!("Dish {i}"), 5, 5, &["x"]))
            .await
            .unwrap();
    }

    let page1 = Filters::new(FOOD_SORT_SAFELIST).page(1).page_size(2);
    let page2 = Filters::new(FOOD_SORT_SAFELIST).page(2).page_size(2);
    let page3 = Filters::new(FOOD_SORT_SAFELIST).page(3).page_size(2);

    let (items1, meta1) = foods.get_all("", &[], &page1).await.unwrap();
    let (items2, meta2) = foods.get_all("", &[], &page2).await.unwrap();
    let (items3, _) = foods.get_all("", &[], &page3).await.unwrap();

    assert_eq!(items1.len(), 2);
    assert_eq!(items2.len(), 2);
    assert_eq!(items3.len(), 1);

    assert_eq!(meta1.last_page, 3);
    assert_eq!(meta1.total_records, 5);
    assert_eq!(meta2.current_page, 2);

    // No row appears on two pages.
    let mut all_ids: Vec<i64> = items1
        .iter()
        .chain(items2.iter())
        .chain(items3.iter())
        .map(|f| f.id)
        .collect();
    all_ids.dedup();
    assert_eq!(all_ids.len(), 5);
}

#[tokio::test]
async fn page_past_the_end_is_empty_with_zero_metadata() {
    let db = test_db().await;
    seed_foods(&db).await;

    let filters = Filters::new(FOOD_SORT_SAFELIST).page(50).page_size(20);
    let (items, metadata) = db.foods().get_all("", &[], &filters).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(metadata, Metadata::default());
}

#[tokio::test]
async fn unsafe_sort_key_never_reaches_sql() {
    let db = test_db().await;
    seed_foods(&db).await;

    let filters = Filters::new(FOOD_SORT_SAFELIST).sort("; DROP TABLE foods");

    // Validation rejects it first...
    assert!(validation::validate_filters(&filters).is_err());

    // ...and the store refuses it even if validation were skipped.
    let err = db.foods().get_all("", &[], &filters).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidSort(_)));

    // The table is still there.
    assert!(db.foods().get_all("", &[], &Filters::new(FOOD_SORT_SAFELIST)).await.is_ok());
}

// =============================================================================
// Deadlines
// =============================================================================

#[tokio::test]
async fn starved_store_call_reports_timeout_not_partial_results() {
    let db = test_db().await;
    let foods = db.foods();

    // The in-memory pool has exactly one connection; holding it starves
    // every store call. The per-call deadline (3s) is shorter than the
    // pool's acquire timeout (5s), so the call fails as Timeout.
    let held = db.pool().acquire().await.unwrap();

    let err = foods.get(1).await.unwrap_err();
    assert!(matches!(err, DbError::Timeout));
    // A deadline is a fault, not an expected outcome like NotFound.
    assert!(!err.is_expected());

    // Releasing the connection restores normal service.
    drop(held);
    assert!(matches!(
        foods.get(1).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
}

// =============================================================================
// Sales store
// =============================================================================

#[tokio::test]
async fn sale_store_shares_the_same_behavior() {
    let db = test_db().await;
    let sales = db.sales();

    let inserted = sales
        .insert(sale("Lunch Deal", "pizza and salad", 120, &["2", "3"]))
        .await
        .unwrap();
    assert_eq!(inserted.version, 1);

    let (items, _) = sales
        .get_all("lunch", &tags(&["2"]), &bistro_db::SaleStore::filters())
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description, "pizza and salad");

    let filters = Filters::new(SALE_SORT_SAFELIST).sort("-duration");
    sales.insert(sale("Happy Hour", "zero", 240, &["1"])).await.unwrap();
    let (items, _) = sales.get_all("", &[], &filters).await.unwrap();
    assert_eq!(items[0].title, "Happy Hour");

    // description is a sortable column for sales.
    let filters = Filters::new(SALE_SORT_SAFELIST).sort("-description");
    assert!(validation::validate_filters(&filters).is_ok());
    let (items, _) = sales.get_all("", &[], &filters).await.unwrap();
    assert_eq!(items[0].description, "zero");

    // Sale references to foods are best-effort: inserting a sale that
    // points at a nonexistent food id is not an error.
    let dangling = sales
        .insert(sale("Ghost Deal", "", 30, &["9999"]))
        .await
        .unwrap();
    assert!(dangling.id > 0);
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[tokio::test]
async fn pasta_scenario_end_to_end() {
    let db = test_db().await;
    let foods = db.foods();

    let pasta = foods.insert(food("Pasta", 12, 20, &["flour", "egg"])).await.unwrap();
    assert_eq!(pasta.version, 1);
    assert!(pasta.id >= 1);

    // Advance the row, then replay a stale write.
    let mut current = foods.get(pasta.id).await.unwrap();
    current.price = 13;
    foods.update(current).await.unwrap(); // store now at version 2

    let mut stale = pasta.clone();
    stale.price = 14;
    assert!(matches!(
        foods.update(stale).await.unwrap_err(),
        DbError::EditConflict { .. }
    ));

    foods.insert(food("Pizza", 10, 15, &["dough"])).await.unwrap();
    foods.insert(food("Soup", 6, 10, &["tomato"])).await.unwrap();

    let (items, metadata) = foods
        .get_all("", &[], &Filters::new(FOOD_SORT_SAFELIST))
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    let ids: Vec<i64> = items.iter().map(|f| f.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(
        metadata,
        Metadata {
            current_page: 1,
            page_size: 20,
            first_page: 1,
            last_page: 1,
            total_records: 3,
        }
    );
}
