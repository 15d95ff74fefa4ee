//! Linking process records into a tree.
//!
//! [`ProcessTree::build`] stores every process in a [`Tree`] arena and links
//! each one under its parent. The arena starts with a reserved slot that acts
//! as the root when the requested root process is missing from the listing.
//!
//! # Stubs
//!
//! A parent accepts at most `max_children` children. The first child over the
//! limit is kept as a stub and every later one is folded into it: the stub
//! takes the largest memory and CPU values seen and counts how many processes
//! it stands for. Once every process is linked, each stub is renamed
//! `<N omitted>` and appended as the last child of its parent.

use std::{cmp::Ordering, collections::HashMap};

use log::{debug, info};

use pscircle_core::tree::{NodeId, Tree};

use crate::process::{MAX_NAME_LENGTH, Process};

/// Number of rows kept in each toplist.
pub const TOPLIST_ROWS: usize = 5;

/// Pid of the reserved root slot while it is not used as the root.
const RESERVED_PID: i32 = -1;

/// Options controlling how processes are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Pid of the process drawn at the center.
    pub root_pid: i32,
    /// Most children linked under one parent before the rest are folded
    /// into a stub.
    pub max_children: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            root_pid: 0,
            max_children: 38,
        }
    }
}

/// Processes folded into one stub node.
#[derive(Debug, Clone, Copy)]
struct Stub {
    index: usize,
    count: usize,
}

/// Process records linked into a tree.
#[derive(Debug)]
pub struct ProcessTree {
    tree: Tree,
    /// Indexed by node slot; slot 0 is the reserved root.
    processes: Vec<Process>,
    root: NodeId,
    cpu_toplist: Vec<NodeId>,
    mem_toplist: Vec<NodeId>,
}

impl ProcessTree {
    /// Links `processes` into a tree.
    ///
    /// Processes are attached in input order. A process whose parent pid is
    /// not in the listing stays unattached and is not reachable from
    /// [`ProcessTree::root`]. When several processes share a pid, the first
    /// one is used as parent.
    pub fn build(processes: Vec<Process>, options: &TreeOptions) -> Self {
        let mut records = Vec::with_capacity(processes.len() + 1);
        records.push(Process::new(RESERVED_PID, RESERVED_PID, 0.0, 0, ""));
        records.extend(processes);

        let mut tree = Tree::with_capacity(records.len());
        let nodes: Vec<NodeId> = records.iter().map(|_| tree.push()).collect();

        let root_index = match records.iter().position(|p| p.pid == options.root_pid) {
            Some(index) => index,
            None => {
                records[0].pid = options.root_pid;
                0
            }
        };

        let cpu_toplist = toplist(&records, &nodes, |a, b| b.cpu.total_cmp(&a.cpu));
        let mem_toplist = toplist(&records, &nodes, |a, b| b.mem.cmp(&a.mem));

        let mut by_pid: HashMap<i32, usize> = HashMap::with_capacity(records.len());
        for (index, process) in records.iter().enumerate() {
            by_pid.entry(process.pid).or_insert(index);
        }

        let mut stubs: Vec<Option<Stub>> = vec![None; records.len()];
        for index in 1..records.len() {
            if index == root_index {
                continue;
            }

            let Some(&parent) = by_pid.get(&records[index].ppid) else {
                continue;
            };
            if parent == index {
                continue;
            }

            if tree.child_count(nodes[parent]) < options.max_children {
                tree.add(nodes[parent], nodes[index]);
                continue;
            }

            match stubs[parent] {
                None => stubs[parent] = Some(Stub { index, count: 1 }),
                Some(stub) => {
                    let (mem, cpu) = (records[index].mem, records[index].cpu);
                    let folded = &mut records[stub.index];
                    folded.mem = folded.mem.max(mem);
                    if cpu > folded.cpu {
                        folded.cpu = cpu;
                    }
                    stubs[parent] = Some(Stub {
                        count: stub.count + 1,
                        ..stub
                    });
                }
            }
        }

        let mut omitted = 0;
        for (parent, stub) in stubs.into_iter().enumerate() {
            let Some(stub) = stub else {
                continue;
            };

            records[stub.index].name = format!("<{} omitted>", stub.count)
                .chars()
                .take(MAX_NAME_LENGTH)
                .collect();
            tree.add(nodes[parent], nodes[stub.index]);
            omitted += stub.count;
        }

        let root = nodes[root_index];
        info!(
            processes = records.len() - 1,
            root_pid = records[root_index].pid,
            omitted;
            "Process tree linked"
        );

        Self {
            tree,
            processes: records,
            root,
            cpu_toplist,
            mem_toplist,
        }
    }

    /// Returns the node drawn at the center.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the process stored at `node`.
    pub fn process(&self, node: NodeId) -> &Process {
        &self.processes[node.index()]
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access for reordering and layout.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Finds the first process with `pid` under the root, in preorder.
    pub fn find_by_pid(&self, pid: i32) -> Option<NodeId> {
        self.tree
            .preorder(self.root)
            .find(|&node| self.process(node).pid == pid)
    }

    /// Finds the first process named `name` under the root, in preorder.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.tree
            .preorder(self.root)
            .find(|&node| self.process(node).name == name)
    }

    /// Processes with the highest CPU usage, highest first.
    pub fn cpu_toplist(&self) -> &[NodeId] {
        &self.cpu_toplist
    }

    /// Processes with the highest memory usage, highest first.
    pub fn mem_toplist(&self) -> &[NodeId] {
        &self.mem_toplist
    }

    /// Returns the number of processes read, excluding the reserved slot.
    pub fn len(&self) -> usize {
        self.processes.len() - 1
    }

    /// Returns `true` if no process was read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Picks the [`TOPLIST_ROWS`] first processes in `order`. Equal values keep
/// their input order.
fn toplist<F>(records: &[Process], nodes: &[NodeId], order: F) -> Vec<NodeId>
where
    F: Fn(&Process, &Process) -> Ordering,
{
    let mut ranked: Vec<usize> = (1..records.len()).collect();
    ranked.sort_by(|&a, &b| order(&records[a], &records[b]));
    ranked.truncate(TOPLIST_ROWS);

    debug!(rows = ranked.len(); "Toplist ranked");

    ranked.into_iter().map(|index| nodes[index]).collect()
}
