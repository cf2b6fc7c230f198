use hostsweep_common::network::interface::{self, LocalInterface};

use crate::mprint;
use crate::terminal::{format, print};

pub fn interfaces() {
    let locals: Vec<LocalInterface> = interface::local_interfaces();
    if locals.is_empty() {
        print::print_status("No usable IPv4 interface found");
        return;
    }

    for (idx, local) in locals.iter().enumerate() {
        print::tree_head(idx, &local.name);
        print::as_tree_one_level(format::interface_details(local));
        if idx + 1 != locals.len() {
            mprint!();
        }
    }
}
