pub mod amm_v4;
