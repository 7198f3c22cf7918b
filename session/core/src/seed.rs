//! Demo Seed
//!
//! The blocks a fresh session opens with.

use crate::block::{Block, BlockType};
use crate::session::Session;

const LISTING: &str = "total 48\n\
drwxr-xr-x  8 user user  4096 Jan 15 10:30 .\n\
drwxr-xr-x 18 user user  4096 Jan 10 09:15 ..\n\
-rw-r--r--  1 user user  1024 Jan 15 10:25 file.txt";

const SYSTEM_INFO: &str = "OS: Linux\nKernel: 6.12.57\nArchitecture: amd64\nUptime: 5 days, 3 hours";

const HEALTHY: &str =
    "✓ Operation completed successfully!\n✓ All checks passed\n✓ System is healthy";

/// Progress of the seeded progress block
pub const SEED_PROGRESS: f64 = 0.65;

/// Append the demo blocks and select the first one
pub fn seed(session: &mut Session) {
    let id = session.allocate_id();
    session.append(
        Block::new(id, BlockType::Command, "Command Execution")
            .with_command("ls -la")
            .with_output(LISTING),
    );

    let id = session.allocate_id();
    session.append(Block::new(id, BlockType::Info, "System Information").with_content(SYSTEM_INFO));

    let id = session.allocate_id();
    session.append(
        Block::new(id, BlockType::Progress, "Progress Indicator").with_progress(SEED_PROGRESS),
    );

    let id = session.allocate_id();
    let rows = [
        ["Name", "Status", "CPU %", "Memory %"],
        ["nginx", "Running", "2.5", "15.3"],
        ["postgres", "Running", "1.2", "45.8"],
        ["redis", "Running", "0.8", "12.1"],
    ];
    session.append(
        Block::new(id, BlockType::Table, "Data Table").with_table(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        ),
    );

    let id = session.allocate_id();
    session.append(Block::new(id, BlockType::Success, "Success Message").with_content(HEALTHY));

    session.select(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_layout() {
        let mut session = Session::new();
        seed(&mut session);

        let types: Vec<BlockType> = session.blocks().iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Command,
                BlockType::Info,
                BlockType::Progress,
                BlockType::Table,
                BlockType::Success,
            ]
        );
        assert_eq!(session.selected_index(), Some(0));
        assert!(session.is_consistent());
        assert_eq!(session.loading_progress_count(), 1);
        assert_eq!(session.blocks()[0].viewport.content_lines, 4);
        assert_eq!(session.blocks()[3].table_data[0][0], "Name");
    }
}
