pub mod reconciler;

pub use reconciler::{ReconcilePlan, SubDocumentReconciler};
