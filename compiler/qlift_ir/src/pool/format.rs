//! Human-readable rendering of pool types for logs and error messages.

use super::{Family, Pool, TypeData};
use crate::Idx;

impl Pool {
    /// Render `idx` as source-like text: `Deferred<int>`, `fn(str) -> bool`.
    pub fn display(&self, idx: Idx) -> String {
        let mut out = String::new();
        self.write_type(&mut out, idx);
        out
    }

    fn write_type(&self, out: &mut String, idx: Idx) {
        if idx.is_none() {
            out.push_str("<none>");
            return;
        }
        if let Some(name) = idx.name() {
            out.push_str(name);
            return;
        }

        match self.try_data(idx) {
            Some(TypeData::Class { name, .. }) => out.push_str(self.names().lookup(name)),
            Some(TypeData::Generic {
                family: Family::Function,
                args,
            }) => {
                let Some((ret, params)) = args.split_last() else {
                    out.push_str("fn()");
                    return;
                };
                out.push_str("fn(");
                self.write_list(out, params);
                out.push_str(") -> ");
                self.write_type(out, *ret);
            }
            Some(TypeData::Generic { family, args }) => {
                out.push_str(family.name());
                out.push('<');
                self.write_list(out, &args);
                out.push('>');
            }
            Some(_) | None => {
                out.push_str("<unknown ");
                out.push_str(&idx.raw().to_string());
                out.push('>');
            }
        }
    }

    fn write_list(&self, out: &mut String, types: &[Idx]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, *ty);
        }
    }
}
