use crate::models::{Block, LineRecord};

/// Split `lines` into maximal runs of the same commit, preserving order.
pub fn group(lines: &[LineRecord]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in lines {
        match blocks.last_mut() {
            Some(block) if block.commit_hash == line.commit_hash => {
                block.start_line = block.start_line.min(line.final_line);
                block.end_line = block.end_line.max(line.final_line);
                block.lines.push(line.clone());
            }
            _ => blocks.push(Block {
                commit_hash: line.commit_hash.clone(),
                short_hash: line.short_hash.clone(),
                author: line.author.clone(),
                relative_date: line.relative_date.clone(),
                summary: line.summary.clone(),
                lines: vec![line.clone()],
                start_line: line.final_line,
                end_line: line.final_line,
            }),
        }
    }

    blocks
}
