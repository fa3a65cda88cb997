// src/lexer/tables/io.rs
use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{DenseDfa, Dfa, Symbol};
use crate::error::TablesError;
use crate::lexer::charset::CHAR_SPACE;
use crate::lexer::nfa::StateId;

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct StateDisk {
    // JSON object keys must be strings; keep byte labels as pairs.
    #[serde_as(as = "Vec<(_, _)>")]
    next: BTreeMap<u8, StateId>,
    accept: Option<Symbol>,
}

#[derive(Serialize, Deserialize)]
struct DfaDisk {
    start: StateId,
    states: Vec<StateDisk>,
}

impl From<&Dfa> for DfaDisk {
    fn from(dfa: &Dfa) -> Self {
        Self {
            start: Dfa::START,
            states: dfa
                .transition_table()
                .iter()
                .zip(dfa.accepting_table())
                .map(|(next, accept)| StateDisk {
                    next: next.clone(),
                    accept: accept.clone(),
                })
                .collect(),
        }
    }
}

impl DfaDisk {
    fn into_dfa(self) -> Result<Dfa, TablesError> {
        if self.start != Dfa::START {
            return Err(TablesError::Malformed(format!(
                "start state is {}, expected {}",
                self.start,
                Dfa::START
            )));
        }
        if self.states.is_empty() {
            return Err(TablesError::Malformed("no states".into()));
        }
        let n = self.states.len();
        let mut dfa = Dfa::empty();
        let mut rows = Vec::with_capacity(n);
        for s in self.states {
            dfa.add_state(s.accept);
            rows.push(s.next);
        }
        for (from, row) in rows.into_iter().enumerate() {
            for (c, to) in row {
                if to as usize >= n || c as usize >= CHAR_SPACE {
                    return Err(TablesError::Malformed(format!(
                        "state {from} has edge {c} -> {to} outside the tables"
                    )));
                }
                dfa.add_transition(from as StateId, c, to);
            }
        }
        Ok(dfa)
    }
}

pub fn write_dfa_json<W: Write>(w: W, dfa: &Dfa) -> Result<(), TablesError> {
    serde_json::to_writer(w, &DfaDisk::from(dfa))?;
    Ok(())
}

pub fn save_dfa_json(path: &Path, dfa: &Dfa) -> Result<(), TablesError> {
    // Stream to disk to avoid giant intermediate strings.
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    write_dfa_json(&mut w, dfa)?;
    w.flush()?;
    Ok(())
}

pub fn load_dfa_json_bytes(data: &[u8]) -> Result<Dfa, TablesError> {
    serde_json::from_slice::<DfaDisk>(data)?.into_dfa()
}

// -------------------- Compact binary --------------------
//   magic: 8 bytes = "LXDFA002"
//   u32:   n_states
//   u32:   n_symbols
//   u32:   next[n_states * 128]      // REJECT = u32::MAX
//   u32:   token_of[n_states]        // INVALID_TOKEN = u32::MAX
//   u32:   symbols_len, then symbols as JSON (symbols_len bytes)

const BIN_MAGIC: &[u8; 8] = b"LXDFA002";

pub fn write_dfa_bin<W: Write>(mut w: W, dfa: &Dfa) -> Result<(), TablesError> {
    let dense = dfa.to_dense();
    let symbols = serde_json::to_vec(&dense.symbols)?;

    w.write_all(BIN_MAGIC)?;
    w.write_all(&dense.n_states.to_le_bytes())?;
    w.write_all(&(dense.symbols.len() as u32).to_le_bytes())?;

    // Rows are small; pack each into one buffer to reduce write calls.
    let mut row = vec![0u8; CHAR_SPACE * 4];
    for chunk in dense.next.chunks(CHAR_SPACE) {
        for (i, &v) in chunk.iter().enumerate() {
            row[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        w.write_all(&row)?;
    }
    for &t in &dense.token_of {
        w.write_all(&t.to_le_bytes())?;
    }
    w.write_all(&(symbols.len() as u32).to_le_bytes())?;
    w.write_all(&symbols)?;
    Ok(())
}

pub fn save_dfa_bin(path: &Path, dfa: &Dfa) -> Result<(), TablesError> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    write_dfa_bin(&mut w, dfa)?;
    w.flush()?;
    log::info!(
        "Saved DFA tables to {} in {} ms",
        path.display(),
        instant.elapsed().as_millis()
    );
    Ok(())
}

#[inline]
fn take_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, TablesError> {
    if buf.len() < 4 {
        return Err(TablesError::Truncated(what));
    }
    let mut le = [0u8; 4];
    le.copy_from_slice(&buf[..4]);
    *buf = &buf[4..];
    Ok(u32::from_le_bytes(le))
}

pub fn load_dfa_bin_bytes(mut data: &[u8]) -> Result<Dfa, TablesError> {
    if data.len() < 8 + 4 + 4 {
        return Err(TablesError::Truncated("header"));
    }
    if &data[..8] != BIN_MAGIC {
        return Err(TablesError::BadMagic);
    }
    data = &data[8..];

    let n_states = take_u32(&mut data, "n_states")?;
    let n_symbols = take_u32(&mut data, "n_symbols")? as usize;

    let ne_len = (n_states as usize)
        .checked_mul(CHAR_SPACE)
        .ok_or_else(|| TablesError::Malformed("n_states overflow".into()))?;
    // The header is untrusted; never reserve more than the payload can hold.
    let need = ne_len
        .checked_add(n_states as usize)
        .and_then(|words| words.checked_mul(4))
        .ok_or_else(|| TablesError::Malformed("n_states overflow".into()))?;
    if data.len() < need {
        return Err(TablesError::Truncated("next"));
    }
    let mut next = Vec::with_capacity(ne_len);
    for _ in 0..ne_len {
        next.push(take_u32(&mut data, "next")?);
    }
    let mut token_of = Vec::with_capacity(n_states as usize);
    for _ in 0..n_states {
        token_of.push(take_u32(&mut data, "token_of")?);
    }

    let symbols_len = take_u32(&mut data, "symbols_len")? as usize;
    if data.len() < symbols_len {
        return Err(TablesError::Truncated("symbols"));
    }
    let symbols: Vec<Symbol> = serde_json::from_slice(&data[..symbols_len])?;
    if symbols.len() != n_symbols {
        return Err(TablesError::Malformed(format!(
            "header says {n_symbols} symbols, trailer has {}",
            symbols.len()
        )));
    }

    let dense = DenseDfa {
        n_states,
        next,
        token_of,
        symbols,
    };
    Dfa::from_dense(&dense).map_err(TablesError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::{compile, rules_in_order};

    fn sample() -> Dfa {
        compile(&rules_in_order([
            ("if", "If"),
            (r"\l\w*", "Ident"),
            (r"\d\d*", "Int"),
            (r"[ \t\n]", "White"),
        ]))
        .unwrap()
    }

    #[test]
    fn json_tables_load_back_identical() {
        let dfa = sample();
        let mut buf = Vec::new();
        write_dfa_json(&mut buf, &dfa).unwrap();
        assert_eq!(load_dfa_json_bytes(&buf).unwrap(), dfa);
    }

    #[test]
    fn bin_tables_load_back_identical() {
        let dfa = sample();
        let mut buf = Vec::new();
        write_dfa_bin(&mut buf, &dfa).unwrap();
        assert_eq!(load_dfa_bin_bytes(&buf).unwrap(), dfa);
    }

    #[test]
    fn bin_rejects_bad_magic_and_truncation() {
        let mut buf = Vec::new();
        write_dfa_bin(&mut buf, &sample()).unwrap();

        let mut bad = buf.clone();
        bad[0] = b'X';
        assert!(matches!(load_dfa_bin_bytes(&bad), Err(TablesError::BadMagic)));

        let cut = &buf[..buf.len() / 2];
        assert!(matches!(
            load_dfa_bin_bytes(cut),
            Err(TablesError::Truncated(_))
        ));
    }

    #[test]
    fn bin_huge_state_count_is_truncation_not_oom() {
        let mut buf = BIN_MAGIC.to_vec();
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        let err = load_dfa_bin_bytes(&buf).unwrap_err();
        if cfg!(target_pointer_width = "64") {
            assert!(matches!(err, TablesError::Truncated("next")), "{err}");
        } else {
            assert!(matches!(err, TablesError::Malformed(_)), "{err}");
        }
    }

    #[test]
    fn json_rejects_dangling_edge() {
        let json = br#"{"start":0,"states":[{"next":[[97,5]],"accept":null}]}"#;
        assert!(matches!(
            load_dfa_json_bytes(json),
            Err(TablesError::Malformed(_))
        ));
    }
}
