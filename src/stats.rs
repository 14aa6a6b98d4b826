//! Simulation statistics collection and reporting.
//!
//! Counters are updated by the pipeline stages and the cycle loop. The
//! report comes in three renderings: a console summary, the numbered
//! `Stat<N>:` file format, and JSON.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::pipeline::signals::InstClass;

/// Simulation statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub cycles: u64,
    /// Instructions decoded, including ones later squashed.
    pub instructions: u64,
    pub instructions_retired: u64,

    pub inst_alu: u64,
    pub inst_data_transfer: u64,
    pub inst_control: u64,

    pub pipeline_stalls: u64,
    /// Cycles with IF/ID depending on an uncommitted producer. A dependency
    /// stalled over two cycles counts twice.
    pub data_hazards: u64,
    /// Pipeline redirects after a branch or jump resolved.
    pub control_hazards: u64,
    pub branch_mispredictions: u64,
    pub stalls_data: u64,
    /// Live instructions squashed by redirects.
    pub stalls_control: u64,

    pub branch_predictions: u64,
    pub branch_correct: u64,
}

impl SimStats {
    /// Counts one retired instruction under its class.
    pub fn retire(&mut self, class: InstClass) {
        self.instructions_retired += 1;
        match class {
            InstClass::Alu => self.inst_alu += 1,
            InstClass::DataTransfer => self.inst_data_transfer += 1,
            InstClass::Control => self.inst_control += 1,
            InstClass::None => {}
        }
    }

    /// Cycles per instruction; zero before any instruction is decoded.
    pub fn cpi(&self) -> f64 {
        if self.instructions == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions as f64
        }
    }

    /// The numbered statistics report.
    pub fn report(&self) -> String {
        let rows: [(&str, String); 12] = [
            ("Total number of cycles", self.cycles.to_string()),
            ("Total instructions executed", self.instructions.to_string()),
            ("CPI", format!("{:.4}", self.cpi())),
            ("Number of Data-transfer (load and store) instructions executed", self.inst_data_transfer.to_string()),
            ("Number of ALU instructions executed", self.inst_alu.to_string()),
            ("Number of Control instructions executed", self.inst_control.to_string()),
            ("Number of stalls/bubbles in the pipeline", self.pipeline_stalls.to_string()),
            ("Number of cycles with data hazards", self.data_hazards.to_string()),
            ("Number of control hazards", self.control_hazards.to_string()),
            ("Number of branch mispredictions", self.branch_mispredictions.to_string()),
            ("Number of stalls due to data hazards", self.stalls_data.to_string()),
            ("Number of stalls due to control hazards", self.stalls_control.to_string()),
        ];
        let mut out = String::new();
        for (i, (label, value)) in rows.iter().enumerate() {
            let _ = writeln!(out, "Stat{}: {}: {}", i + 1, label, value);
        }
        out
    }

    /// Serializes the counters as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints a formatted summary to stdout.
    pub fn print(&self) {
        let cyc = self.cycles.max(1) as f64;
        let retired = self.instructions_retired.max(1) as f64;
        let bp_acc = if self.branch_predictions > 0 {
            100.0 * (1.0 - self.branch_mispredictions as f64 / self.branch_predictions as f64)
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("RISC-V PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions);
        println!("sim_insts_retired        {}", self.instructions_retired);
        println!("sim_cpi                  {:.4}", self.cpi());
        println!("----------------------------------------------------------");
        println!("PIPELINE");
        println!(
            "  stalls.total           {} ({:.2}%)",
            self.pipeline_stalls,
            self.pipeline_stalls as f64 / cyc * 100.0
        );
        println!("  stalls.data            {}", self.stalls_data);
        println!("  stalls.control         {}", self.stalls_control);
        println!("  hazards.data_cycles    {}", self.data_hazards);
        println!("  hazards.control        {}", self.control_hazards);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            self.inst_alu as f64 / retired * 100.0
        );
        println!(
            "  op.data_transfer       {} ({:.2}%)",
            self.inst_data_transfer,
            self.inst_data_transfer as f64 / retired * 100.0
        );
        println!(
            "  op.control             {} ({:.2}%)",
            self.inst_control,
            self.inst_control as f64 / retired * 100.0
        );
        println!("----------------------------------------------------------");
        println!("BRANCH PREDICTION");
        println!("  bp.lookups             {}", self.branch_predictions);
        println!("  bp.mispredicts         {}", self.branch_mispredictions);
        println!("  bp.accuracy            {:.2}%", bp_acc);
        println!("==========================================================");
    }
}
