//! Integration tests for the array repository pipeline.

use std::sync::Arc;
use std::thread;

use listable::{
    ArrayRepository, Dir, FilterSpec, Filters, ListState, ListableError, Number, Record,
    Repository, Row, Scalar, Value,
};
use serde_json::json;

// ============================================================================
// Test helpers
// ============================================================================

fn test_row(a: &str, b: i64) -> Row {
    Row::from([
        ("a".to_string(), Scalar::from(a)),
        ("b".to_string(), Scalar::from(b)),
    ])
}

fn prepare_test_data(length: i64) -> Vec<Row> {
    (0..length)
        .map(|i| test_row(&format!("Test {i}"), i + 1))
        .collect()
}

fn repository(length: i64) -> ArrayRepository<Row> {
    ArrayRepository::builder()
        .data(prepare_test_data(length))
        .build()
        .unwrap()
}

fn state(limit: usize) -> ListState {
    ListState::new(0, limit).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn create_with_empty_data() {
    let repository = ArrayRepository::<Row>::builder()
        .data(Vec::new())
        .build()
        .unwrap();
    assert!(repository.data().is_empty());
}

#[test]
fn get_result_first_page() {
    let result = repository(100).get_result(&state(1)).unwrap();

    assert_eq!(result.total_count(), 100);
    assert_eq!(result.rows(), &[test_row("Test 0", 1)]);
}

#[test]
fn filter_by_substring_and_number() {
    let state = ListState::builder()
        .limit(1)
        .filter("a", "test 9")
        .filter("b", "100")
        .build()
        .unwrap();

    let result = repository(100).get_result(&state).unwrap();

    assert_eq!(result.total_count(), 1);
    assert_eq!(result.rows(), &[test_row("Test 99", 100)]);
}

#[test]
fn filter_by_substring_and_range() {
    let state = ListState::builder()
        .limit(2)
        .filter("a", "test")
        .filter("b", FilterSpec::between("97", "99"))
        .build()
        .unwrap();

    let result = repository(100).get_result(&state).unwrap();

    assert_eq!(result.total_count(), 3);
    assert_eq!(
        result.rows(),
        &[test_row("Test 96", 97), test_row("Test 97", 98)]
    );
}

#[test]
fn filter_override_replaces_builtin_filtering() {
    let data = prepare_test_data(100);
    let repository = ArrayRepository::builder()
        .data(data.clone())
        .filter(|rows, _state| Ok(rows.iter().take(50).collect()))
        .build()
        .unwrap();

    // A filter that would exclude every row if it were applied
    let state = ListState::builder()
        .limit(1)
        .filter("a", "no such row")
        .build()
        .unwrap();

    let result = repository.get_result(&state).unwrap();

    assert_eq!(result.total_count(), 50);
    assert_eq!(result.rows(), &data[..1]);
}

#[test]
fn null_filters_are_ignored() {
    let filters: Filters = [("a".to_string(), None)].into_iter().collect();
    let state = ListState::builder()
        .limit(1)
        .filters(filters)
        .build()
        .unwrap();

    let result = repository(100).get_result(&state).unwrap();
    assert_eq!(result.total_count(), 100);
}

#[test]
fn sort_descending_by_text() {
    let state = ListState::builder()
        .limit(1)
        .sort("a", Dir::Desc)
        .build()
        .unwrap();

    let result = repository(100).get_result(&state).unwrap();

    assert_eq!(result.total_count(), 100);
    assert_eq!(result.rows(), &[test_row("Test 99", 100)]);
}

#[test]
fn sort_override_replaces_builtin_sorting() {
    let repository = ArrayRepository::builder()
        .data(prepare_test_data(100))
        .sort(|rows, _state| Ok(rows))
        .build()
        .unwrap();
    let state = ListState::builder()
        .limit(1)
        .sort("a", Dir::Desc)
        .build()
        .unwrap();

    let result = repository.get_result(&state).unwrap();

    assert_eq!(result.total_count(), 100);
    assert_eq!(result.rows(), &[test_row("Test 0", 1)]);
}

// ============================================================================
// Paging
// ============================================================================

#[test]
fn pages_walk_the_sorted_rows() {
    let repository = repository(10);
    let sorted = |page| {
        let state = ListState::builder()
            .page(page)
            .limit(4)
            .sort("b", Dir::Desc)
            .build()
            .unwrap();
        repository.get_result(&state).unwrap()
    };

    let first = sorted(0);
    assert_eq!(first.rows()[0], test_row("Test 9", 10));
    assert_eq!(first.len(), 4);

    let last = sorted(2);
    assert_eq!(last.rows(), &[test_row("Test 1", 2), test_row("Test 0", 1)]);
    assert_eq!(last.total_count(), 10);

    let beyond = sorted(3);
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_count(), 10);
}

#[test]
fn huge_page_index_is_empty_not_an_error() {
    let state = ListState::new(usize::MAX, usize::MAX).unwrap();
    let result = repository(5).get_result(&state).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.total_count(), 5);
}

#[test]
fn multi_key_sort_uses_insertion_order() {
    let data = vec![
        test_row("x", 2),
        test_row("y", 1),
        test_row("x", 1),
        test_row("y", 2),
    ];
    let repository = ArrayRepository::new(data);
    let state = ListState::builder()
        .limit(10)
        .sort("a", Dir::Desc)
        .sort("b", Dir::Asc)
        .build()
        .unwrap();

    let result = repository.get_result(&state).unwrap();
    assert_eq!(
        result.rows(),
        &[
            test_row("y", 1),
            test_row("y", 2),
            test_row("x", 1),
            test_row("x", 2),
        ]
    );
}

// ============================================================================
// Degraded rows
// ============================================================================

#[test]
fn bad_rows_are_excluded_not_errors() {
    let mut data = prepare_test_data(3);
    data.push(Row::from([("a".to_string(), Scalar::from("Test x"))]));
    data.push(test_row("Test y", 2));
    data[4].insert("b".to_string(), Scalar::from("two"));

    let repository = ArrayRepository::new(data);
    let state = ListState::builder()
        .limit(10)
        .filter("b", FilterSpec::between(1, 10))
        .build()
        .unwrap();

    let result = repository.get_result(&state).unwrap();
    assert_eq!(result.total_count(), 3);
}

#[test]
fn malformed_range_bound_excludes_every_row() {
    let state = ListState::builder()
        .limit(10)
        .filter("b", FilterSpec::range(Some(Scalar::from("low")), None))
        .build()
        .unwrap();

    let result = repository(10).get_result(&state).unwrap();
    assert_eq!(result.total_count(), 0);
    assert!(result.is_empty());
}

#[test]
fn override_error_reaches_caller() {
    let repository = ArrayRepository::builder()
        .data(prepare_test_data(3))
        .filter(|_rows, _state| Err("index unavailable".into()))
        .build()
        .unwrap();

    let err = repository.get_result(&state(1)).unwrap_err();
    assert!(matches!(err, ListableError::Override(_)));
    assert_eq!(err.to_string(), "index unavailable");
}

#[test]
fn missing_data_is_a_configuration_error() {
    let err = ArrayRepository::<Row>::builder()
        .sort(|rows, _state| Ok(rows))
        .build()
        .unwrap_err();
    assert!(matches!(err, ListableError::MissingData));
}

// ============================================================================
// Large numbers
// ============================================================================

const P53: i64 = 1 << 53;

fn number_row(n: Number) -> Row {
    Row::from([("n".to_string(), Scalar::Number(n))])
}

/// Exact value of an integral number cell.
fn exact(row: &Row) -> i128 {
    match row["n"] {
        Scalar::Number(Number::I64(n)) => n.into(),
        Scalar::Number(Number::U64(n)) => n.into(),
        Scalar::Number(Number::F64(n)) => n as i128,
        Scalar::String(_) => panic!("numeric rows only"),
    }
}

/// Integers around 2^53 in every representation, interleaved so that
/// floats that round together sit between distinct integers.
fn rows_near_two_pow_53() -> Vec<Row> {
    let mut data = Vec::new();
    for step in 0..9i64 {
        let offset = (step * 5) % 9 - 4;
        let n = P53 + offset;
        data.push(number_row(Number::I64(n)));
        data.push(number_row(Number::F64(n as f64)));
        data.push(number_row(Number::U64(n as u64)));
    }
    data
}

#[test]
fn mixed_number_variants_sort_exactly_near_f64_limit() {
    let repository = ArrayRepository::new(rows_near_two_pow_53());

    for dir in [Dir::Asc, Dir::Desc] {
        let state = ListState::builder()
            .limit(100)
            .sort("n", dir)
            .build()
            .unwrap();
        let result = repository.get_result(&state).unwrap();

        assert_eq!(result.total_count(), 27);
        for pair in result.rows().windows(2) {
            let (prev, next) = (exact(&pair[0]), exact(&pair[1]));
            match dir {
                Dir::Asc => assert!(prev <= next, "{prev} before {next}"),
                Dir::Desc => assert!(prev >= next, "{prev} before {next}"),
            }
        }
    }
}

#[test]
fn range_bound_is_not_rounded() {
    let data = vec![
        number_row(Number::I64(P53)),
        number_row(Number::I64(P53 + 1)),
        number_row(Number::U64(P53 as u64 + 1)),
    ];
    let state = ListState::builder()
        .limit(10)
        .filter("n", FilterSpec::range(None, Some(Scalar::from(P53 as f64))))
        .build()
        .unwrap();

    let result = ArrayRepository::new(data).get_result(&state).unwrap();
    assert_eq!(result.total_count(), 1);
    assert_eq!(result.rows(), &[number_row(Number::I64(P53))]);
}

// ============================================================================
// Other record types
// ============================================================================

#[test]
fn json_rows() {
    let data = vec![
        json!({"name": "Widget", "price": 12.5}),
        json!({"name": "Gadget", "price": 3}),
        json!({"name": "Gizmo", "price": "7"}),
        json!({"name": "Doohickey"}),
        json!({"name": "Sprocket", "price": "1"}),
    ];
    let repository = ArrayRepository::new(data);
    let state = ListState::builder()
        .limit(10)
        .filter("price", FilterSpec::range(Some(Scalar::from(3)), None))
        .sort("price", Dir::Asc)
        .build()
        .unwrap();

    let result = repository.get_result(&state).unwrap();
    assert_eq!(result.total_count(), 3);
    // "7" passes the range as numeric text but sorts as text, after numbers
    let names: Vec<&str> = result
        .rows()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Gadget", "Widget", "Gizmo"]);
}

#[derive(Debug, Clone, PartialEq)]
struct Product {
    name: String,
    stock: u64,
}

impl Record for Product {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "name" => Value::String(&self.name),
            "stock" => Value::Number(Number::from(self.stock)),
            _ => Value::None,
        }
    }
}

#[test]
fn struct_rows() {
    let data = vec![
        Product {
            name: "Bolt".to_string(),
            stock: 40,
        },
        Product {
            name: "Nut".to_string(),
            stock: 0,
        },
        Product {
            name: "Washer".to_string(),
            stock: 40,
        },
    ];
    let repository = ArrayRepository::new(data);
    let state = ListState::builder()
        .limit(2)
        .filter("stock", 40i64)
        .sort("name", Dir::Desc)
        .build()
        .unwrap();

    let result = repository.get_result(&state).unwrap();
    assert_eq!(result.total_count(), 2);
    assert_eq!(result.rows()[0].name, "Washer");
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn concurrent_readers_see_identical_results() {
    let repository = Arc::new(repository(100));
    let state = Arc::new(
        ListState::builder()
            .page(1)
            .limit(7)
            .filter("a", "1")
            .sort("b", Dir::Desc)
            .build()
            .unwrap(),
    );
    let expected = repository.get_result(&state).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let repository = Arc::clone(&repository);
            let state = Arc::clone(&state);
            thread::spawn(move || repository.get_result(&state).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn shared_dataset_between_repositories() {
    let data: Arc<[Row]> = prepare_test_data(20).into();
    let all = ArrayRepository::builder()
        .shared_data(Arc::clone(&data))
        .build()
        .unwrap();
    let evens = ArrayRepository::builder()
        .shared_data(data)
        .filter(|rows, _state| {
            Ok(rows
                .iter()
                .filter(|row| matches!(row["b"], Scalar::Number(Number::I64(n)) if n % 2 == 0))
                .collect())
        })
        .build()
        .unwrap();

    assert_eq!(all.get_result(&state(1)).unwrap().total_count(), 20);
    assert_eq!(evens.get_result(&state(1)).unwrap().total_count(), 10);
}

#[test]
fn result_serializes_for_transport() {
    let result = repository(100).get_result(&state(1)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        json!({"rows": [{"a": "Test 0", "b": 1}], "total_count": 100})
    );
    assert_eq!(result.page_count(1), 100);
}

#[test]
fn state_from_json_drives_the_pipeline() {
    let state: ListState = serde_json::from_value(json!({
        "page": 0,
        "limit": 2,
        "filters": {"a": "test", "b": {"from": "97", "to": "99"}}
    }))
    .unwrap();

    let result = repository(100).get_result(&state).unwrap();
    assert_eq!(result.total_count(), 3);
    assert_eq!(result.rows()[1], test_row("Test 97", 98));
}
