use crate::model::Category;

/// Smallest target that is split into three category batches.
pub const BATCH_MODE_THRESHOLD: usize = 70;

/// Size of each of the first two batches in batch mode.
pub const FIXED_BATCH_SIZE: usize = 30;

/// One planned request: which category, how many cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub category: Category,
    pub count: usize,
}

/// Splits `target_count` into the ordered batches to request.
///
/// Batch mode with a target of at least 70 gives 30, 30 and `target - 60`;
/// anything else is one Happy Path batch of the full target.
pub fn plan_batches(target_count: usize, batch_mode: bool) -> Vec<BatchPlan> {
    if batch_mode && target_count >= BATCH_MODE_THRESHOLD {
        vec![
            BatchPlan {
                category: Category::HappyPath,
                count: FIXED_BATCH_SIZE,
            },
            BatchPlan {
                category: Category::Validation,
                count: FIXED_BATCH_SIZE,
            },
            BatchPlan {
                category: Category::EdgeCases,
                count: target_count - 2 * FIXED_BATCH_SIZE,
            },
        ]
    } else {
        vec![BatchPlan {
            category: Category::HappyPath,
            count: target_count,
        }]
    }
}
