//! Truck endpoints: history view, details, workflow actions

pub mod dto;
pub mod handlers;

pub use dto::{
    AcceptTruckRequest, HistoryEntryDto, ListTrucksParams, RefuseTruckRequest,
    RegisterTruckRequest, SubmitAnalysisRequest, TruckDto, TruckProductsDto,
};
pub use handlers::TruckHandlerState;
