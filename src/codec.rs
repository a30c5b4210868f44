//! Line-oriented text export of a skip list.
//!
//! Each entry is written as `key<TAB>value` on its own line, in ascending key
//! order. Keys and values go through `Display` on the way out and `FromStr`
//! on the way in, so neither may contain a tab or a line break.

use crate::skiplist::SkipList;
use crate::{ensure, Error};
use rand::RngCore;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

const SEPARATOR: char = '\t';

fn is_plain(field: &str) -> bool {
    !field.contains([SEPARATOR, '\n', '\r'])
}

/// Writes every entry and returns how many were written.
pub fn dump<K, V, R, W>(list: &SkipList<K, V, R>, mut writer: W) -> crate::Result<usize>
where
    K: Display,
    V: Display,
    W: Write,
{
    let mut count = 0;
    for (key, value) in list.iter() {
        let line = count + 1;
        let key = key.to_string();
        let value = value.to_string();
        ensure!(
            is_plain(&key),
            Error::Codec {
                line,
                reason: format!("key {:?} contains a separator", key),
            }
        );
        ensure!(
            is_plain(&value),
            Error::Codec {
                line,
                reason: format!("value {:?} contains a separator", value),
            }
        );
        writeln!(writer, "{}{}{}", key, SEPARATOR, value)?;
        count += 1;
    }
    writer.flush()?;
    log::debug!("dumped {} entries", count);
    Ok(count)
}

/// Inserts every entry read from `reader` into `list`.
///
/// Stops at the first bad line. Entries before it stay inserted.
pub fn load_into<K, V, R, B>(list: &mut SkipList<K, V, R>, reader: B) -> crate::Result<usize>
where
    K: Ord + FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
    R: RngCore,
    B: BufRead,
{
    let mut count = 0;
    for (idx, text) in reader.lines().enumerate() {
        let line = idx + 1;
        let text = text?;
        if text.is_empty() {
            continue;
        }
        let (key, value) = text.split_once(SEPARATOR).ok_or_else(|| Error::Codec {
            line,
            reason: "missing tab separator".to_string(),
        })?;
        let key = key.parse::<K>().map_err(|e| Error::Codec {
            line,
            reason: format!("invalid key: {}", e),
        })?;
        let value = value.parse::<V>().map_err(|e| Error::Codec {
            line,
            reason: format!("invalid value: {}", e),
        })?;
        ensure!(list.insert(key, value), Error::DuplicateEntry { line });
        count += 1;
    }
    log::debug!("loaded {} entries", count);
    Ok(count)
}

pub fn load<K, V, B>(reader: B) -> crate::Result<SkipList<K, V>>
where
    K: Ord + FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
    B: BufRead,
{
    let mut list = SkipList::new();
    load_into(&mut list, reader)?;
    Ok(list)
}

pub fn dump_to_file<K, V, R>(list: &SkipList<K, V, R>, path: impl AsRef<Path>) -> crate::Result<usize>
where
    K: Display,
    V: Display,
{
    let file = File::create(path.as_ref())?;
    dump(list, BufWriter::new(file))
}

pub fn load_from_file<K, V>(path: impl AsRef<Path>) -> crate::Result<SkipList<K, V>>
where
    K: Ord + FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
{
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file))
}
