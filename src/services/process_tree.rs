use parking_lot::Mutex;
use std::collections::HashMap;
use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, System};
use tracing::trace;

/// Результат одного запроса родителя процесса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLookup {
    /// Родитель найден
    Found(u32),
    /// Дошли до корня дерева процессов (pid 0 или родителя нет)
    Root,
    /// Процесс уже завершился или недоступен
    Gone,
}

/// Read-only view of the OS process table.
///
/// Lookups race with process exit; implementations must report a vanished
/// process as [`ParentLookup::Gone`] instead of failing.
pub trait ProcessTree: Send + Sync {
    fn parent_of(&self, pid: u32) -> ParentLookup;
}

/// Дерево процессов ОС через sysinfo
pub struct SysinfoProcessTree {
    // Общий экземпляр System, чтобы не пересоздавать его на каждый запрос
    system: Mutex<System>,
}

impl Default for SysinfoProcessTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProcessTree {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl ProcessTree for SysinfoProcessTree {
    fn parent_of(&self, pid: u32) -> ParentLookup {
        if pid == 0 {
            return ParentLookup::Root;
        }

        let pid_obj = SysinfoPid::from_u32(pid);
        let mut system = self.system.lock();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

        let lookup = match system.process(pid_obj) {
            Some(process) => match process.parent() {
                Some(parent) if parent.as_u32() != 0 => ParentLookup::Found(parent.as_u32()),
                _ => ParentLookup::Root,
            },
            None => ParentLookup::Gone,
        };
        trace!(pid, ?lookup, "Запрос родителя процесса");
        lookup
    }
}

/// Фиксированное дерево процессов (pid -> ppid) для dry-run и тестов
#[derive(Debug, Clone, Default)]
pub struct StaticProcessTree {
    parents: HashMap<u32, u32>,
}

impl StaticProcessTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, pid: u32, ppid: u32) -> Self {
        self.parents.insert(pid, ppid);
        self
    }

    /// Эмулировать завершение процесса
    pub fn remove(&mut self, pid: u32) {
        self.parents.remove(&pid);
    }
}

impl ProcessTree for StaticProcessTree {
    fn parent_of(&self, pid: u32) -> ParentLookup {
        match self.parents.get(&pid) {
            Some(0) => ParentLookup::Root,
            Some(&ppid) => ParentLookup::Found(ppid),
            None if pid == 0 => ParentLookup::Root,
            None => ParentLookup::Gone,
        }
    }
}
