//! Partition-exchange sort used for order statistics.

/// Return a sorted copy of `values`. Duplicates are preserved.
pub fn quick_sort<T: Ord + Clone>(values: &[T]) -> Vec<T> {
    let mut out = values.to_vec();
    quick_sort_in_place(&mut out);
    out
}

/// Recursive quicksort with a middle pivot and three-way partitioning, so
/// runs of equal values do not degrade to quadratic time.
pub fn quick_sort_in_place<T: Ord>(values: &mut [T]) {
    if values.len() <= 1 {
        return;
    }

    let (lt, gt) = partition(values, values.len() / 2);
    let (left, rest) = values.split_at_mut(lt);
    quick_sort_in_place(left);
    quick_sort_in_place(&mut rest[gt - lt..]);
}

/// Dutch-flag partition around `values[pivot]`.
///
/// Afterwards `values[..lt] < p`, `values[lt..gt] == p`, `values[gt..] > p`.
fn partition<T: Ord>(values: &mut [T], pivot: usize) -> (usize, usize) {
    values.swap(0, pivot);
    let (mut lt, mut i, mut gt) = (0, 1, values.len());
    // values[lt] is always the pivot value.
    while i < gt {
        match values[i].cmp(&values[lt]) {
            std::cmp::Ordering::Less => {
                values.swap(lt, i);
                lt += 1;
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                gt -= 1;
                values.swap(i, gt);
            }
            std::cmp::Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}
