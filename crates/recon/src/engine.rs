use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::CompareConfig;
use crate::dataset::Dataset;
use crate::error::ReconError;
use crate::model::{AlignMode, Locator, Mismatch, ReconMeta, ReconReport, ReconSummary, MISSING};

/// Run one comparison per config. Returns the ordered mismatch report.
///
/// Single pure computation: validate → align → compare → report. Every
/// failure is detected before alignment starts; comparison itself cannot
/// fail once validated.
pub fn run(
    config: &CompareConfig,
    left: &Dataset,
    right: &Dataset,
) -> Result<ReconReport, ReconError> {
    config.validate()?;

    // Column-order-insensitive mode restricts both sides to the columns
    // they share before anything else looks at them.
    let projected;
    let (left, right) = if config.ignore_column_order {
        let common = left.common_columns(right);
        projected = (left.project(&common)?, right.project(&common)?);
        (&projected.0, &projected.1)
    } else {
        (left, right)
    };

    validate_columns(config, left, right)?;

    let (mode, mismatches, compared, left_only, right_only) = match &config.keys {
        Some(keys) => {
            let keyed = compare_keyed(&config.compare, keys, left, right);
            (
                AlignMode::Keyed,
                keyed.mismatches,
                keyed.compared,
                keyed.left_only,
                keyed.right_only,
            )
        }
        None => {
            let mismatches = compare_positional(&config.compare, left, right);
            let compared = left.len().min(right.len());
            (AlignMode::Positional, mismatches, compared, 0, 0)
        }
    };

    let summary = ReconSummary {
        left_rows: left.len(),
        right_rows: right.len(),
        compared,
        left_only,
        right_only,
        mismatches: mismatches.len(),
    };

    Ok(ReconReport {
        meta: ReconMeta {
            mode,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        mismatches,
    })
}

/// Every compare and key column must exist in both datasets.
fn validate_columns(
    config: &CompareConfig,
    left: &Dataset,
    right: &Dataset,
) -> Result<(), ReconError> {
    let keys = config.keys.as_deref().unwrap_or(&[]);
    for dataset in [left, right] {
        for column in config.compare.iter().chain(keys) {
            if !dataset.has_column(column) {
                return Err(ReconError::MissingColumn {
                    dataset: dataset.name().to_string(),
                    column: column.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Comparison form: trimmed and case-folded. Reported values stay raw.
fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

fn field<'a>(row: &'a HashMap<String, String>, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Positional alignment
// ---------------------------------------------------------------------------

/// Compare row i against row i, up to the shorter dataset. Surplus rows in
/// the longer dataset are ignored (documented policy).
fn compare_positional(compare: &[String], left: &Dataset, right: &Dataset) -> Vec<Mismatch> {
    let aligned = left.len().min(right.len());
    let mut mismatches = Vec::new();

    for i in 0..aligned {
        let left_row = &left.rows()[i];
        let right_row = &right.rows()[i];
        for column in compare {
            let left_value = field(left_row, column);
            let right_value = field(right_row, column);
            if fold(left_value) != fold(right_value) {
                mismatches.push(Mismatch {
                    locator: Locator::Row(i),
                    column: column.clone(),
                    left: left_value.to_string(),
                    right: right_value.to_string(),
                });
            }
        }
    }

    mismatches
}

// ---------------------------------------------------------------------------
// Keyed alignment
// ---------------------------------------------------------------------------

struct KeyedOutput {
    mismatches: Vec<Mismatch>,
    compared: usize,
    left_only: usize,
    right_only: usize,
}

fn key_of(row: &HashMap<String, String>, keys: &[String]) -> Vec<String> {
    keys.iter().map(|k| field(row, k).to_string()).collect()
}

/// Align rows by key tuple and compare the union of keys from both sides,
/// ascending. A repeated key within one side overwrites the earlier row
/// (last-write-wins, documented policy). A side lacking a key contributes
/// the `<missing>` sentinel for every compared column.
fn compare_keyed(
    compare: &[String],
    keys: &[String],
    left: &Dataset,
    right: &Dataset,
) -> KeyedOutput {
    let mut left_map: BTreeMap<Vec<String>, &HashMap<String, String>> = BTreeMap::new();
    for row in left.rows() {
        left_map.insert(key_of(row, keys), row);
    }
    let mut right_map: BTreeMap<Vec<String>, &HashMap<String, String>> = BTreeMap::new();
    for row in right.rows() {
        right_map.insert(key_of(row, keys), row);
    }

    // BTree order over the key tuples gives ascending lexicographic
    // iteration, so output order is reproducible across runs.
    let mut all_keys: BTreeSet<&Vec<String>> = left_map.keys().collect();
    all_keys.extend(right_map.keys());

    let mut mismatches = Vec::new();
    let mut left_only = 0;
    let mut right_only = 0;

    for key in &all_keys {
        let left_row = left_map.get(*key).copied();
        let right_row = right_map.get(*key).copied();
        match (left_row, right_row) {
            (Some(_), None) => left_only += 1,
            (None, Some(_)) => right_only += 1,
            _ => {}
        }

        for column in compare {
            let left_value = left_row.map(|row| field(row, column));
            let right_value = right_row.map(|row| field(row, column));

            let equal = match (left_value, right_value) {
                (Some(l), Some(r)) => fold(l) == fold(r),
                // Both sentinels: nothing to compare.
                (None, None) => true,
                // The sentinel never equals a folded value.
                _ => false,
            };

            if !equal {
                mismatches.push(Mismatch {
                    locator: Locator::Key((*key).clone()),
                    column: column.clone(),
                    left: left_value.map_or_else(|| MISSING.to_string(), str::to_string),
                    right: right_value.map_or_else(|| MISSING.to_string(), str::to_string),
                });
            }
        }
    }

    KeyedOutput {
        mismatches,
        compared: all_keys.len(),
        left_only,
        right_only,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(name: &str, columns: &[&str], rows: &[&[&str]]) -> Dataset {
        let cols: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows: Vec<HashMap<String, String>> = rows
            .iter()
            .map(|values| {
                columns
                    .iter()
                    .zip(values.iter())
                    .map(|(c, v)| (c.to_string(), v.to_string()))
                    .collect()
            })
            .collect();
        Dataset::from_rows(name, cols, rows).unwrap()
    }

    fn compare(columns: &[&str]) -> CompareConfig {
        CompareConfig::positional(columns.iter().map(|c| c.to_string()).collect())
    }

    fn compare_by(columns: &[&str], keys: &[&str]) -> CompareConfig {
        CompareConfig::keyed(
            columns.iter().map(|c| c.to_string()).collect(),
            keys.iter().map(|k| k.to_string()).collect(),
        )
    }

    #[test]
    fn identical_datasets_produce_no_mismatches() {
        let a = dataset("a", &["id", "name"], &[&["1", "Ann"], &["2", "Bob"]]);
        let b = dataset("b", &["id", "name"], &[&["1", "Ann"], &["2", "Bob"]]);

        let positional = run(&compare(&["id", "name"]), &a, &b).unwrap();
        assert!(positional.mismatches.is_empty());
        assert_eq!(positional.summary.compared, 2);

        let keyed = run(&compare_by(&["name"], &["id"]), &a, &b).unwrap();
        assert!(keyed.mismatches.is_empty());
        assert_eq!(keyed.summary.left_only, 0);
        assert_eq!(keyed.summary.right_only, 0);
    }

    #[test]
    fn case_and_whitespace_differences_never_mismatch() {
        let a = dataset("a", &["id", "name"], &[&["1", "Ann"]]);
        let b = dataset("b", &["id", "name"], &[&["1", "  aNN "]]);
        let report = run(&compare(&["name"]), &a, &b).unwrap();
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn other_character_differences_always_mismatch_with_raw_values() {
        let a = dataset("a", &["id", "name"], &[&["1", "Ann"]]);
        let b = dataset("b", &["id", "name"], &[&["1", "Anne"]]);
        let report = run(&compare(&["name"]), &a, &b).unwrap();
        assert_eq!(report.mismatches.len(), 1);
        let m = &report.mismatches[0];
        assert_eq!(m.locator, Locator::Row(0));
        assert_eq!(m.column, "name");
        assert_eq!(m.left, "Ann");
        assert_eq!(m.right, "Anne");
    }

    #[test]
    fn positional_truncates_to_shorter_dataset() {
        let a = dataset(
            "a",
            &["v"],
            &[&["1"], &["2"], &["3"], &["4"], &["5"]],
        );
        let b = dataset("b", &["v"], &[&["9"], &["9"], &["9"]]);
        let report = run(&compare(&["v"]), &a, &b).unwrap();

        assert_eq!(report.summary.compared, 3);
        assert_eq!(report.mismatches.len(), 3);
        for m in &report.mismatches {
            match m.locator {
                Locator::Row(i) => assert!(i < 3),
                ref other => panic!("unexpected locator {other:?}"),
            }
        }
    }

    #[test]
    fn keyed_scenario_with_one_sided_keys() {
        // Key 1 matches after folding; key 2 is left-only, key 3 right-only.
        let a = dataset("a", &["id", "name"], &[&["1", "Ann"], &["2", "bob "]]);
        let b = dataset("b", &["id", "name"], &[&["1", "ann"], &["3", "Cid"]]);
        let report = run(&compare_by(&["name"], &["id"]), &a, &b).unwrap();

        assert_eq!(report.summary.compared, 3);
        assert_eq!(report.summary.left_only, 1);
        assert_eq!(report.summary.right_only, 1);
        assert_eq!(
            report.mismatches,
            vec![
                Mismatch {
                    locator: Locator::Key(vec!["2".into()]),
                    column: "name".into(),
                    left: "bob".into(),
                    right: MISSING.into(),
                },
                Mismatch {
                    locator: Locator::Key(vec!["3".into()]),
                    column: "name".into(),
                    left: MISSING.into(),
                    right: "Cid".into(),
                },
            ]
        );
    }

    #[test]
    fn one_sided_key_yields_one_mismatch_per_compare_column() {
        let a = dataset(
            "a",
            &["id", "name", "qty"],
            &[&["1", "Ann", "3"], &["2", "Bob", "5"]],
        );
        let b = dataset("b", &["id", "name", "qty"], &[&["1", "Ann", "3"]]);
        let report = run(&compare_by(&["name", "qty"], &["id"]), &a, &b).unwrap();

        assert_eq!(report.mismatches.len(), 2);
        for m in &report.mismatches {
            assert_eq!(m.locator, Locator::Key(vec!["2".into()]));
            assert_eq!(m.right, MISSING);
        }
    }

    #[test]
    fn keyed_output_ascends_by_key_tuple() {
        let a = dataset(
            "a",
            &["id", "v"],
            &[&["30", "x"], &["9", "x"], &["100", "x"]],
        );
        let b = dataset("b", &["id", "v"], &[&["30", "y"], &["9", "y"], &["100", "y"]]);
        let report = run(&compare_by(&["v"], &["id"]), &a, &b).unwrap();

        let keys: Vec<String> = report
            .mismatches
            .iter()
            .map(|m| match &m.locator {
                Locator::Key(parts) => parts[0].clone(),
                other => panic!("unexpected locator {other:?}"),
            })
            .collect();
        // String keys sort lexicographically, not numerically.
        assert_eq!(keys, ["100", "30", "9"]);
    }

    #[test]
    fn composite_key_tuples_align_and_order() {
        let a = dataset(
            "a",
            &["id", "region", "v"],
            &[&["2", "eu", "x"], &["1", "us", "x"]],
        );
        let b = dataset(
            "b",
            &["id", "region", "v"],
            &[&["1", "us", "y"], &["2", "eu", "x"]],
        );
        let report = run(&compare_by(&["v"], &["id", "region"]), &a, &b).unwrap();

        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(
            report.mismatches[0].locator,
            Locator::Key(vec!["1".into(), "us".into()])
        );
    }

    #[test]
    fn duplicate_keys_take_the_later_row() {
        let a = dataset("a", &["id", "v"], &[&["1", "first"], &["1", "second"]]);
        let b = dataset("b", &["id", "v"], &[&["1", "second"]]);
        let report = run(&compare_by(&["v"], &["id"]), &a, &b).unwrap();
        assert!(report.mismatches.is_empty());

        let c = dataset("c", &["id", "v"], &[&["1", "first"]]);
        let report = run(&compare_by(&["v"], &["id"]), &a, &c).unwrap();
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].left, "second");
    }

    #[test]
    fn empty_value_vs_missing_key_still_mismatches() {
        let a = dataset("a", &["id", "v"], &[&["1", ""]]);
        let b = dataset("b", &["id", "v"], &[]);
        let report = run(&compare_by(&["v"], &["id"]), &a, &b).unwrap();

        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].left, "");
        assert_eq!(report.mismatches[0].right, MISSING);
    }

    #[test]
    fn validation_rejects_absent_compare_column() {
        let a = dataset("left.csv", &["id"], &[&["1"]]);
        let b = dataset("right.csv", &["id", "name"], &[&["1", "Ann"]]);
        let err = run(&compare(&["name"]), &a, &b).unwrap_err();
        assert!(err.to_string().contains("'left.csv'"));
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn validation_rejects_absent_key_column() {
        let a = dataset("a", &["id", "v"], &[&["1", "x"]]);
        let b = dataset("b", &["v"], &[&["x"]]);
        let err = run(&compare_by(&["v"], &["id"]), &a, &b).unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { .. }));
    }

    #[test]
    fn validation_rejects_empty_compare_set() {
        let a = dataset("a", &["id"], &[&["1"]]);
        let err = run(&compare(&[]), &a, &a.clone()).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn ignore_column_order_drops_one_sided_columns() {
        let a = dataset(
            "a",
            &["id", "name", "left_extra"],
            &[&["1", "Ann", "x"]],
        );
        let b = dataset(
            "b",
            &["name", "id", "right_extra"],
            &[&["Ann", "1", "y"]],
        );

        let mut config = compare_by(&["name"], &["id"]);
        config.ignore_column_order = true;
        let report = run(&config, &a, &b).unwrap();
        assert!(report.mismatches.is_empty());

        // Same comparison against a one-sided column still fails validation.
        let mut config = compare_by(&["left_extra"], &["id"]);
        config.ignore_column_order = true;
        assert!(run(&config, &a, &b).is_err());
    }

    #[test]
    fn meta_reflects_alignment_mode() {
        let a = dataset("a", &["id"], &[&["1"]]);
        let positional = run(&compare(&["id"]), &a, &a.clone()).unwrap();
        assert_eq!(positional.meta.mode, AlignMode::Positional);

        let keyed = run(&compare_by(&["id"], &["id"]), &a, &a.clone()).unwrap();
        assert_eq!(keyed.meta.mode, AlignMode::Keyed);
        assert!(!keyed.meta.engine_version.is_empty());
    }
}
