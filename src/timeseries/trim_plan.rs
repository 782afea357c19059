use crate::storage_engine::WriteBatch;

/// Ops that trim one namespace, computed by a read-only scan.
///
/// Plans from different namespaces touch disjoint keys, so they can be built
/// concurrently and merged into one batch afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimPlan {
    pub namespace: String,
    /// Every key at or below the boundary, ascending.
    pub deletes: Vec<Vec<u8>>,
    /// `(boundary key, last value at or below the boundary)`.
    pub checkpoint: Option<(Vec<u8>, Vec<u8>)>,
}

impl TrimPlan {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// `true` when the namespace has nothing at or below the boundary.
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.checkpoint.is_none()
    }

    /// Appends the deletes, then the checkpoint put, to `batch`.
    ///
    /// The put must follow the deletes: the checkpoint key is usually among
    /// them when an entry sits exactly on the boundary.
    pub fn stage_into(self, batch: &mut WriteBatch) -> TrimStats {
        if self.is_empty() {
            return TrimStats::default();
        }

        let stats = TrimStats {
            namespaces: 1,
            deleted: self.deletes.len(),
            checkpoints: usize::from(self.checkpoint.is_some()),
        };

        for key in self.deletes {
            batch.delete(key);
        }
        if let Some((key, value)) = self.checkpoint {
            batch.put(key, value);
        }

        stats
    }
}

/// What a trim committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimStats {
    /// Namespaces that had anything at or below the boundary.
    pub namespaces: usize,
    /// Keys deleted, including ones rewritten as checkpoints.
    pub deleted: usize,
    pub checkpoints: usize,
}

impl std::ops::AddAssign for TrimStats {
    fn add_assign(&mut self, other: Self) {
        self.namespaces += other.namespaces;
        self.deleted += other.deleted;
        self.checkpoints += other.checkpoints;
    }
}

impl std::fmt::Display for TrimStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} namespace(s) trimmed, {} key(s) deleted, {} checkpoint(s) written",
            self.namespaces, self.deleted, self.checkpoints
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::BatchOp;

    #[test]
    fn test_checkpoint_is_staged_after_deletes() {
        let plan = TrimPlan {
            namespace: "ns".into(),
            deletes: vec![b"ns|1000".to_vec(), b"ns|2000".to_vec()],
            checkpoint: Some((b"ns|2000".to_vec(), b"v".to_vec())),
        };

        let mut batch = WriteBatch::new();
        let stats = plan.stage_into(&mut batch);

        assert_eq!(
            stats,
            TrimStats {
                namespaces: 1,
                deleted: 2,
                checkpoints: 1
            }
        );
        assert!(matches!(batch.ops().last(), Some(BatchOp::Put { key, .. }) if key == b"ns|2000"));
    }

    #[test]
    fn test_empty_plan_stages_nothing() {
        let mut batch = WriteBatch::new();
        assert_eq!(TrimPlan::new("ns").stage_into(&mut batch), TrimStats::default());
        assert!(batch.is_empty());
    }
}
