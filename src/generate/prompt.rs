//! Prompt construction for the generation backend
//!
//! Each resource mode gets its own designer role and guideline block, and
//! its own visual style modifiers. Supplies and weather are appended as
//! constraint context when present.

use crate::invention::{InventionRequest, ResourceMode};

/// Build the full concept-generation prompt for a request
pub fn concept_prompt(request: &InventionRequest) -> String {
    let mode = request.resource_mode;

    let supplies_context = match &request.available_supplies {
        Some(supplies) if !supplies.trim().is_empty() => format!(
            "\nConstraint: the user has these specific ingredients/materials available: \"{}\". \
             Prioritize using these items in the solution.",
            supplies
        ),
        _ => String::new(),
    };

    let weather_context = match &request.weather {
        Some(w) => format!(
            "\nCritical weather factor: temperature {}C, wind {} km/h, pressure {} hPa, sky {}. \
             Adapt the invention to these conditions (high wind favors heavy or aerodynamic \
             tools; low pressure means carp feed actively on the bottom; cold water favors \
             highly soluble baits).",
            w.temperature, w.wind_speed, w.pressure, w.condition
        ),
        None => String::new(),
    };

    format!(
        "{role}\n\
         Your task is to INVENT a brand new, novel tool, rig component, accessory, or bait \
         for carp fishing.\n\n\
         Context:\n\
         The user is facing this challenge: \"{challenge}\".\n\
         The fishing environment is: \"{environment}\".{supplies}{weather}\n\n\
         {guidelines}\n\n\
         General rules:\n\
         1. Consider physics, hydrodynamics, biology, and carp behavior.\n\
         2. Return the data in strictly structured JSON format with exactly these fields: \
         name, tagline, description, mechanism, materials (list), visual_prompt, \
         feasibility_score (integer 1-100), feasibility_analysis, instructions (list), \
         pros (list), cons (list).",
        role = role_for(mode),
        challenge = request.challenge,
        environment = request.environment,
        supplies = supplies_context,
        weather = weather_context,
        guidelines = guidelines_for(mode),
    )
}

/// Build the final image prompt: the concept's visual prompt plus
/// mode-specific style modifiers
pub fn visual_prompt(concept_visual_prompt: &str, mode: ResourceMode) -> String {
    format!(
        "Product photography concept shot: {}. {}. High detail, cinematic lighting, \
         photorealistic, 4k render style, macro shot, shallow depth of field.",
        concept_visual_prompt,
        style_modifiers_for(mode)
    )
}

fn role_for(mode: ResourceMode) -> &'static str {
    match mode {
        ResourceMode::Diy => {
            "You are a master \"garden shed\" inventor and carp fishing expert. You specialize \
             in clever, effective fishing tools built from cheap, accessible materials found in \
             hardware stores, supermarkets, or basic tackle boxes."
        }
        ResourceMode::ThreeDPrint => {
            "You are an expert in 3D printing and additive manufacturing for fishing tackle. \
             You design functional, printable tools for standard hobbyist FDM printers."
        }
        ResourceMode::Bait => {
            "You are a legendary carp bait chef and fish nutritionist. You create high-attract, \
             nutritionally balanced bait recipes that trigger feeding responses in specific \
             conditions."
        }
        ResourceMode::Normal => {
            "You are a pragmatic carp fishing product designer. You design practical, reliable, \
             commercially viable tackle for the everyday angler."
        }
        ResourceMode::Pro => {
            "You are a world-class angling product designer and engineer specializing in \
             future-tech carp fishing innovation."
        }
    }
}

fn guidelines_for(mode: ResourceMode) -> &'static str {
    match mode {
        ResourceMode::Diy => {
            "Guidelines for DIY mode:\n\
             1. The invention must be buildable by a regular person with basic tools.\n\
             2. Use only accessible materials: PVC pipe, plastic bottles, wire, rubber bands, \
             foam, springs, washers, nuts, bolts.\n\
             3. Avoid custom molding, advanced electronics, or proprietary sensors.\n\
             4. feasibility_score means ease of DIY construction.\n\
             5. feasibility_analysis must explain the construction difficulty.\n\
             6. instructions must be numbered build steps."
        }
        ResourceMode::ThreeDPrint => {
            "Guidelines for 3D print mode:\n\
             1. The invention must print on a standard hobbyist FDM printer.\n\
             2. Suggest materials: PLA, PETG, TPU, or ABS/ASA as appropriate.\n\
             3. Prefer print-in-place mechanisms, snap-fits, and modular designs.\n\
             4. feasibility_score means printability (minimal supports scores high).\n\
             5. feasibility_analysis must include recommended slicer settings.\n\
             6. instructions must be assembly or post-processing steps."
        }
        ResourceMode::Bait => {
            "Guidelines for bait kitchen mode:\n\
             1. Invent a novel bait recipe (boilie, paste, dip, or particle blend).\n\
             2. materials must be the ingredient list with ratios and quantities.\n\
             3. mechanism must explain the attraction profile: solubility, signal leakage, \
             digestibility.\n\
             4. feasibility_score means ease of preparation.\n\
             5. feasibility_analysis must explain nutritional value and safety.\n\
             6. instructions must be a step-by-step recipe method.\n\
             7. visual_prompt should describe texture, color, and consistency."
        }
        ResourceMode::Normal => {
            "Guidelines for standard mode:\n\
             1. Invent a practical tool or accessory that fits a standard tackle box.\n\
             2. Use standard manufacturing methods and common materials.\n\
             3. Avoid overly complex electronics or scavenged parts.\n\
             4. feasibility_score means commercial viability and practicality.\n\
             5. feasibility_analysis must explain why it would sell and work reliably.\n\
             6. instructions must be a user guide."
        }
        ResourceMode::Pro => {
            "Guidelines for pro mode:\n\
             1. The invention must be novel and commercially viable for a high-end brand.\n\
             2. Be creative with advanced technology or precision engineering.\n\
             3. Keep it plausible but futuristic.\n\
             4. feasibility_score means manufacturing feasibility.\n\
             5. instructions must be a user manual for operating the device."
        }
    }
}

fn style_modifiers_for(mode: ResourceMode) -> &'static str {
    match mode {
        ResourceMode::Diy => {
            "rustic, handmade, workshop aesthetic, gritty, visible duct tape or glue, \
             garage workbench background"
        }
        ResourceMode::ThreeDPrint => {
            "3d printed texture, visible layer lines, matte pla plastic finish, clean tech \
             background, rapid prototype aesthetic"
        }
        ResourceMode::Bait => {
            "realistic food texture, moist appearance, macro food photography, crumbs, \
             organic, appetizing for fish"
        }
        ResourceMode::Normal => {
            "clean product photography, matte green fishing tackle finish, studio lighting, \
             white or neutral background, professional catalogue style"
        }
        ResourceMode::Pro => "high tech, sleek, carbon fiber finish, product studio lighting",
    }
}
