use pyo3::prelude::*;
use pyo3::types::{IntoPyDict, PyDict, PyFrozenSet};
use pyo3::wrap_pyfunction;

use crate::{compare::Algorithm, transactions::encode, types::RawTransaction};

fn mine_to_dict(
    py: Python,
    algorithm: Algorithm,
    transactions: Vec<RawTransaction>,
    min_support: f64,
) -> PyResult<Py<PyDict>> {
    let (transactions, inventory) = encode(&transactions);
    let frequent_itemsets = algorithm.mine(&transactions, min_support);

    let entries = inventory
        .decode(&frequent_itemsets)
        .into_iter()
        .map(|(itemset, count)| {
            let set: Py<PyFrozenSet> = PyFrozenSet::new(py, &itemset)?.into();
            Ok((set, count))
        })
        .collect::<PyResult<Vec<(Py<PyFrozenSet>, u32)>>>()?;

    Ok(entries.into_py_dict(py).into())
}

/// Frequent itemsets via Apriori, as `{frozenset: count}`.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, /)")]
fn apriori(
    py: Python,
    transactions: Vec<RawTransaction>,
    min_support: f64,
) -> PyResult<Py<PyDict>> {
    mine_to_dict(py, Algorithm::Apriori, transactions, min_support)
}

/// Frequent itemsets via Eclat, as `{frozenset: count}`.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, /)")]
fn eclat(
    py: Python,
    transactions: Vec<RawTransaction>,
    min_support: f64,
) -> PyResult<Py<PyDict>> {
    mine_to_dict(py, Algorithm::Eclat, transactions, min_support)
}

/// Frequent itemsets via FP-Growth, as `{frozenset: count}`.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, /)")]
fn fpgrowth(
    py: Python,
    transactions: Vec<RawTransaction>,
    min_support: f64,
) -> PyResult<Py<PyDict>> {
    mine_to_dict(py, Algorithm::FpGrowth, transactions, min_support)
}

#[pymodule]
fn itemset_mining(_: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(apriori, m)?)?;
    m.add_function(wrap_pyfunction!(eclat, m)?)?;
    m.add_function(wrap_pyfunction!(fpgrowth, m)?)?;
    Ok(())
}
