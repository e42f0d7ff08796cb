//! GitHub compare links for known packages.
//!
//! A curated package → repository map so rendered version changes can
//! link straight to the upstream diff. Unknown packages simply render
//! without a link.

/// Upstream GitHub repositories for commonly tracked packages.
const PACKAGE_REPOS: &[(&str, &str)] = &[
    ("numpy", "numpy/numpy"),
    ("pandas", "pandas-dev/pandas"),
    ("matplotlib", "matplotlib/matplotlib"),
    ("scipy", "scipy/scipy"),
    ("scikit-learn", "scikit-learn/scikit-learn"),
    ("xarray", "pydata/xarray"),
    ("dask", "dask/dask"),
    ("zarr", "zarr-developers/zarr-python"),
    ("pytest", "pytest-dev/pytest"),
    ("hypothesis", "HypothesisWorks/hypothesis"),
    ("requests", "psf/requests"),
    ("flask", "pallets/flask"),
    ("django", "django/django"),
    ("fastapi", "tiangolo/fastapi"),
    ("pydantic", "pydantic/pydantic"),
    ("sqlalchemy", "sqlalchemy/sqlalchemy"),
    ("torch", "pytorch/pytorch"),
    ("tensorflow", "tensorflow/tensorflow"),
];

/// GitHub compare URL for a package's version change, when the upstream
/// repository is known.
///
/// Uses the `v<version>` tag convention, the most common one for the
/// packages in the map.
pub fn compare_url(package: &str, old_version: &str, new_version: &str) -> Option<String> {
    let repo = PACKAGE_REPOS
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, repo)| repo)?;
    Some(format!(
        "https://github.com/{repo}/compare/v{old_version}...v{new_version}"
    ))
}
