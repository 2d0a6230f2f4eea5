//! Three implementations of one contract under different lifecycles

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use wiring_di::{implements, injectable, ContainerBuilder, DiResult, Lifecycle, ServiceProvider};

pub trait RndGuidWriter: Send + Sync {
    fn lifecycle(&self) -> Lifecycle;
    fn guid(&self) -> Uuid;
}

/// Fresh random id per instance
pub struct RandomGuid {
    id: Uuid,
}

impl RandomGuid {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for RandomGuid {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! guid_writer {
    ($name:ident, $lifecycle:expr) => {
        pub struct $name {
            guid: Arc<RandomGuid>,
        }

        impl $name {
            pub fn new(guid: Arc<RandomGuid>) -> Self {
                Self { guid }
            }
        }

        impl RndGuidWriter for $name {
            fn lifecycle(&self) -> Lifecycle {
                $lifecycle
            }

            fn guid(&self) -> Uuid {
                self.guid.id()
            }
        }

        injectable!($name => $name::new, [RandomGuid]);
        implements!($name => dyn RndGuidWriter);
    };
}

guid_writer!(RandomGuidWriter1, Lifecycle::Transient);
guid_writer!(RandomGuidWriter2, Lifecycle::Singleton);
guid_writer!(RandomGuidWriter3, Lifecycle::Scoped);

injectable!(RandomGuid => RandomGuid::new);

/// Registers the writers and their id source
pub struct WriterServices;

impl ServiceProvider for WriterServices {
    fn name(&self) -> &'static str {
        "writers"
    }

    fn register(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
        builder
            .register_transient_as::<dyn RndGuidWriter, RandomGuidWriter1>()?
            .register_singleton_as::<dyn RndGuidWriter, RandomGuidWriter2>()?
            .register_scoped_as::<dyn RndGuidWriter, RandomGuidWriter3>()?
            .register_transient::<RandomGuid>()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WriterLine {
    pub item: usize,
    pub lifecycle: Lifecycle,
    pub guid: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriterPass {
    pub scope_id: u64,
    pub lines: Vec<WriterLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WritersReport {
    /// Root scope, before any scope is begun
    pub before: WriterPass,
    /// Inside a nested scope
    pub scoped: WriterPass,
    /// Root scope again, after the nested scope is disposed
    pub after: WriterPass,
}

impl WritersReport {
    /// Lines whose id stayed the same in every pass
    pub fn stable_items(&self) -> Vec<usize> {
        self.before
            .lines
            .iter()
            .filter(|line| {
                [&self.scoped, &self.after].iter().all(|pass| {
                    pass.lines
                        .iter()
                        .any(|other| other.item == line.item && other.guid == line.guid)
                })
            })
            .map(|line| line.item)
            .collect()
    }
}

fn collect(
    scope_id: u64,
    writers: impl Iterator<Item = DiResult<Arc<dyn RndGuidWriter>>>,
) -> anyhow::Result<WriterPass> {
    let mut lines = Vec::new();
    for (index, writer) in writers.enumerate() {
        let writer = writer.with_context(|| format!("failed to resolve writer {}", index + 1))?;
        lines.push(WriterLine {
            item: index + 1,
            lifecycle: writer.lifecycle(),
            guid: writer.guid(),
        });
    }
    Ok(WriterPass { scope_id, lines })
}

pub fn run() -> anyhow::Result<WritersReport> {
    let mut builder = crate::configured_builder()?;
    builder.add_provider(&WriterServices)?;
    let container = builder.build()?;

    let before = collect(container.root_scope_id(), container.resolve_all::<dyn RndGuidWriter>())?;

    let scoped = {
        let scope = container.begin_scope();
        let pass = collect(scope.id(), scope.resolve_all::<dyn RndGuidWriter>())?;
        scope.dispose();
        pass
    };

    let after = collect(container.root_scope_id(), container.resolve_all::<dyn RndGuidWriter>())?;

    let report = WritersReport {
        before,
        scoped,
        after,
    };
    info!(stable = ?report.stable_items(), "Writers scenario finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_writer_follows_its_lifecycle() {
        let report = run().unwrap();

        assert_eq!(report.before.lines.len(), 3);
        assert_ne!(report.scoped.scope_id, report.before.scope_id);
        assert_eq!(report.after.scope_id, report.before.scope_id);

        let guid = |pass: &WriterPass, item: usize| pass.lines[item - 1].guid;

        // transient changes every pass
        assert_ne!(guid(&report.before, 1), guid(&report.scoped, 1));
        assert_ne!(guid(&report.before, 1), guid(&report.after, 1));

        // singleton never changes
        assert_eq!(guid(&report.before, 2), guid(&report.scoped, 2));
        assert_eq!(guid(&report.before, 2), guid(&report.after, 2));

        // scoped differs inside the scope and is restored after it
        assert_ne!(guid(&report.before, 3), guid(&report.scoped, 3));
        assert_eq!(guid(&report.before, 3), guid(&report.after, 3));

        assert_eq!(report.stable_items(), vec![2]);
    }
}
