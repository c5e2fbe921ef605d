pub mod chemotherapy;
pub mod j_endo;
pub mod jasweb;
pub mod jbcs;
pub mod jiaio;
pub mod jsccr;
pub mod jsge;
pub mod jsom;
pub mod kekkaku;

pub use chemotherapy::ChemotherapySource;
pub use j_endo::JEndoSource;
pub use jasweb::JaswebSource;
pub use jbcs::JbcsSource;
pub use jiaio::JiaioSource;
pub use jsccr::JsccrSource;
pub use jsge::JsgeSource;
pub use jsom::JsomSource;
pub use kekkaku::KekkakuSource;


#[cfg(test)]
crate::test_sites! {
    test_live_chemotherapy(ChemotherapySource),
    test_live_j_endo(JEndoSource),
    test_live_jasweb(JaswebSource),
    test_live_jbcs(JbcsSource),
    test_live_jiaio(JiaioSource),
    test_live_jsccr(JsccrSource),
    test_live_jsge(JsgeSource),
    test_live_jsom(JsomSource),
    test_live_kekkaku(KekkakuSource),
}
