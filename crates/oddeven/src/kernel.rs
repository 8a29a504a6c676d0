use std::fmt;
use std::str::FromStr;

/// Sorting routine applied to a single partition and to merged buffers.
///
/// The engine only needs *a* correct sort; `Bubble` is kept so benchmarks can
/// reproduce the quadratic classroom baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKernel {
    Unstable,
    Bubble,
}

impl Default for SortKernel {
    fn default() -> Self {
        SortKernel::Unstable
    }
}

impl SortKernel {
    pub fn sort<T: Ord>(&self, arr: &mut [T]) {
        match self {
            SortKernel::Unstable => arr.sort_unstable(),
            SortKernel::Bubble => bubble_sort(arr),
        }
    }
}

impl fmt::Display for SortKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKernel::Unstable => write!(f, "unstable"),
            SortKernel::Bubble => write!(f, "bubble"),
        }
    }
}

impl FromStr for SortKernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unstable" | "std" => Ok(SortKernel::Unstable),
            "bubble" => Ok(SortKernel::Bubble),
            other => Err(format!("unknown sort kernel '{}'", other)),
        }
    }
}

/// Bubble sort with early exit once a pass makes no swaps.
pub fn bubble_sort<T: Ord>(arr: &mut [T]) {
    let n = arr.len();
    for i in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..(n - i - 1) {
            if arr[j] > arr[j + 1] {
                arr.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}

pub fn is_sorted<T: Ord>(arr: &[T]) -> bool {
    arr.windows(2).all(|w| w[0] <= w[1])
}
