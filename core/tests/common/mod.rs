use zed81_core::mem::{IO_PORTS, IoPorts, MEMORY_SIZE, Memory};

/// Minimal embedder state for testing: flat 64KB memory plus the port
/// map, with a loader helper.
pub struct TestMem {
    pub memory: Box<Memory>,
    pub io: IoPorts,
}

impl TestMem {
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; MEMORY_SIZE]),
            io: [0; IO_PORTS],
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }
}
