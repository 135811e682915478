use anyhow::Result;
use memodb::lens::memo::{
    MemoAddArgs, MemoChangesArgs, MemoLens, MemoListArgs, MemoSearchArgs, MemoUpdateArgs,
};
use memodb::lens::utils::OutputFormat;
use memodb::MemoDatabase;
use serde_json::json;
use tracing::info;

pub fn add(db: &MemoDatabase, args: &MemoAddArgs, output_format: OutputFormat) -> Result<()> {
    let lens = MemoLens::new(db);
    let memo = lens.add(args)?;
    info!("added memo {}", memo.id);
    println!("{}", lens.format_memos(&[memo], &output_format));
    Ok(())
}

pub fn get(db: &MemoDatabase, id: i64, output_format: OutputFormat) -> Result<()> {
    let lens = MemoLens::new(db);
    let memo = lens.get(id)?;
    println!("{}", lens.format_memo(&memo, &output_format));
    Ok(())
}

pub fn update(db: &MemoDatabase, args: &MemoUpdateArgs, output_format: OutputFormat) -> Result<()> {
    let lens = MemoLens::new(db);
    let memo = lens.update(args)?;
    println!("{}", lens.format_memos(&[memo], &output_format));
    Ok(())
}

pub fn delete(db: &MemoDatabase, id: i64) -> Result<()> {
    MemoLens::new(db).delete(id)?;
    eprintln!("deleted memo {}", id);
    Ok(())
}

pub fn list(db: &MemoDatabase, args: &MemoListArgs, output_format: OutputFormat) -> Result<()> {
    let lens = MemoLens::new(db);
    let memos = lens.list(args)?;
    if memos.is_empty() && !output_format.is_json() {
        eprintln!("no memos");
        return Ok(());
    }
    println!("{}", lens.format_memos(&memos, &output_format));
    Ok(())
}

pub fn count(db: &MemoDatabase, output_format: OutputFormat) -> Result<()> {
    let count = MemoLens::new(db).count()?;
    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => println!("{}", json!({ "count": count })),
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(&json!({ "count": count }))?)
        }
        _ => println!("{}", count),
    }
    Ok(())
}

pub fn search(
    db: &MemoDatabase,
    args: &MemoSearchArgs,
    default_limit: u64,
    output_format: OutputFormat,
) -> Result<()> {
    let lens = MemoLens::new(db);
    let memos = lens.search(args, default_limit)?;
    info!("search '{}' matched {} memos", args.term, memos.len());
    if memos.is_empty() && !output_format.is_json() {
        eprintln!("no memos match '{}'", args.term);
        return Ok(());
    }
    println!("{}", lens.format_memos(&memos, &output_format));
    Ok(())
}

pub fn indexes(db: &MemoDatabase, args: &MemoListArgs, output_format: OutputFormat) -> Result<()> {
    let ids = MemoLens::new(db).indexes(args)?;
    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => println!("{}", serde_json::to_string(&ids)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&ids)?),
        _ => {
            for id in ids {
                println!("{}", id);
            }
        }
    }
    Ok(())
}

pub fn changes(db: &MemoDatabase, args: &MemoChangesArgs, output_format: OutputFormat) -> Result<()> {
    let lens = MemoLens::new(db);
    let ops = lens.changes(args)?;
    if ops.is_empty() && !output_format.is_json() {
        eprintln!("no changes since {}", args.since);
        return Ok(());
    }
    println!("{}", lens.format_operations(&ops, &output_format));
    Ok(())
}
