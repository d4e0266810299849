use std::{
    ffi::OsString,
    path::{Path, PathBuf, MAIN_SEPARATOR},
};

use futures::{
    future::BoxFuture,
    stream::{FuturesUnordered, StreamExt},
    FutureExt,
};

use super::WalkContext;
use crate::error::ScanError;
use crate::types::PathList;

type SubtreeFuture<'a> = BoxFuture<'a, Result<PathList, ScanError>>;

/// Lists `dir` and everything below it.
///
/// Every child is stat'ed concurrently. As soon as a child is classified it is
/// recorded, and a sub-directory starts its own walk right away. The level
/// resolves once all probes and sub-walks have resolved; sub-walk results are
/// appended in the order they complete.
pub(crate) fn walk_dir<'a>(
    ctx: &'a WalkContext<'a>,
    dir: PathBuf,
    prefix: String,
) -> SubtreeFuture<'a> {
    walk_level(ctx, dir, prefix).boxed()
}

async fn walk_level<'a>(
    ctx: &'a WalkContext<'a>,
    dir: PathBuf,
    prefix: String,
) -> Result<PathList, ScanError> {
    let mut found: PathList = Vec::new();

    let names = match list_dir(&dir).await {
        Ok(names) => names,
        Err(e) => {
            ctx.swallow(e)?;
            return Ok(found);
        }
    };

    let mut probes = names
        .into_iter()
        .map(|name| {
            let path = dir.join(&name);
            async move {
                let meta = tokio::fs::metadata(&path).await;
                (name, path, meta)
            }
        })
        .collect::<FuturesUnordered<_>>();
    let mut subtrees: FuturesUnordered<SubtreeFuture<'a>> = FuturesUnordered::new();

    loop {
        tokio::select! {
            Some((name, path, meta)) = probes.next() => {
                let meta = match meta {
                    Ok(m) => m,
                    Err(e) => {
                        ctx.swallow(ScanError::fs(&path, e))?;
                        continue;
                    }
                };
                let name = name.to_string_lossy().into_owned();
                let rel = format!("{}{}", prefix, name);

                if meta.is_dir() {
                    let rel_dir = format!("{}{}", rel, MAIN_SEPARATOR);
                    if ctx.excluded(&rel_dir) {
                        continue;
                    }
                    if ctx.options.include_directories {
                        found.push(rel_dir.clone());
                    }
                    if ctx.descends(&name) {
                        subtrees.push(walk_dir(ctx, path, rel_dir));
                    }
                } else if !ctx.excluded(&rel) {
                    found.push(rel);
                }
            }
            Some(subtree) = subtrees.next() => {
                found.extend(subtree?);
            }
            else => break,
        }
    }

    Ok(found)
}

async fn list_dir(dir: &Path) -> Result<Vec<OsString>, ScanError> {
    let mut rd = tokio::fs::read_dir(dir).await.map_err(|e| ScanError::fs(dir, e))?;
    let mut names = Vec::new();
    while let Some(entry) = rd.next_entry().await.map_err(|e| ScanError::fs(dir, e))? {
        names.push(entry.file_name());
    }
    Ok(names)
}
