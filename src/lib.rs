pub use xr_interact_core::{config, error, frame, grab, hand, input, pose, spatial};

pub use xr_interact_core::{
    FrameContext, FrameHandler, Grabbable, InteractionConfig, InteractionError, InteractionFrame, MatchResult,
    PoseMatcher, PoseTemplate, Result, TemplateCache,
};
