//! Enercon CS101 Expert Feature Catalogue

use crate::derive::{Difference, FeatureCatalog, FeatureGroup, GroupMember, RowSummary};

/// Group name and its (member label, column) pairs
const GROUPS: &[(&str, &[(&str, &str)])] = &[
    (
        "Sys_1_inverters_cabinet_temp",
        &[
            ("inverter_1", "CS101__Sys_1_inverter_1_cabinet_temp"),
            ("inverter_2", "CS101__Sys_1_inverter_2_cabinet_temp"),
            ("inverter_3", "CS101__Sys_1_inverter_3_cabinet_temp"),
            ("inverter_4", "CS101__Sys_1_inverter_4_cabinet_temp"),
            ("inverter_5", "CS101__Sys_1_inverter_5_cabinet_temp"),
            ("inverter_6", "CS101__Sys_1_inverter_6_cabinet_temp"),
            ("inverter_7", "CS101__Sys_1_inverter_7_cabinet_temp"),
        ],
    ),
    (
        "Sys_2_inverters_cabinet_temp",
        &[
            ("inverter_1", "CS101__Sys_2_inverter_1_cabinet_temp"),
            ("inverter_2", "CS101__Sys_2_inverter_2_cabinet_temp"),
            ("inverter_3", "CS101__Sys_2_inverter_3_cabinet_temp"),
            ("inverter_4", "CS101__Sys_2_inverter_4_cabinet_temp"),
        ],
    ),
    (
        "bearing_temp",
        &[
            ("front", "CS101__Front_bearing_temp"),
            ("rear", "CS101__Rear_bearing_temp"),
        ],
    ),
    (
        "pitch_cabinet_blade_temp",
        &[
            ("blade_A", "CS101__Pitch_cabinet_blade_A_temp"),
            ("blade_B", "CS101__Pitch_cabinet_blade_B_temp"),
            ("blade_C", "CS101__Pitch_cabinet_blade_C_temp"),
        ],
    ),
    (
        "rotor_temp",
        &[
            ("rotor_1", "CS101__Rotor_temp_1"),
            ("rotor_2", "CS101__Rotor_temp_2"),
        ],
    ),
    (
        "stator_temp",
        &[
            ("stator_1", "CS101__Stator_temp_1"),
            ("stator_2", "CS101__Stator_temp_2"),
        ],
    ),
    (
        "nacelle_ambient_temp",
        &[
            ("nacelle_ambient_1", "CS101__Nacelle_ambient_temp_1"),
            ("nacelle_ambient_2", "CS101__Nacelle_ambient_temp_2"),
        ],
    ),
];

/// (name, minuend, subtrahend)
const DIFFERENCES: &[(&str, &str, &str)] = &[
    // Max and min of wind speed, rotation, power, reactive power
    ("Dif_max_min_windspeed", "WEC__max_windspeed", "WEC__min_windspeed"),
    ("Dif_max_min_rotation", "WEC_max_Rotation", "WEC_min_Rotation"),
    ("Dif_max_min_Power", "WEC_max_Power", "WEC_min_Power"),
    ("Dif_max_min_reactive_Power", "WEC_max_reactive_Power", "WEC_min_reactive_Power"),
    // Max and average
    ("Dif_max_avg_windspeed", "WEC__max_windspeed", "WEC_ava_windspeed"),
    ("Dif_max_avg_rotation", "WEC_max_Rotation", "WEC_ava_Rotation"),
    ("Dif_max_avg_Power", "WEC_max_Power", "WEC_ava_Power"),
    ("Dif_max_avg_reactive_Power", "WEC_max_reactive_Power", "WEC_ava_reactive_Power"),
    // Average and min
    ("Dif_avg_min_windspeed", "WEC_ava_windspeed", "WEC__min_windspeed"),
    ("Dif_avg_min_rotation", "WEC_ava_Rotation", "WEC_min_Rotation"),
    ("Dif_avg_min_Power", "WEC_ava_Power", "WEC_min_Power"),
    ("Dif_avg_min_reactive_Power", "WEC_ava_reactive_Power", "WEC_min_reactive_Power"),
    // Available power: wind, technical, force majeure, force external
    ("Diff_P_wind_P_technical", "WEC_ava_available_P_from_wind", "WEC_ava_available_P_technical_reasons"),
    ("Diff_P_wind_P_majeure", "WEC_ava_available_P_from_wind", "WEC_ava_Available_P_force_majeure_reasons"),
    ("Diff_P_wind_P_external", "WEC_ava_available_P_from_wind", "WEC_ava_Available_P_force_external_reasons"),
    ("Diff_P_technical_P_majeure", "WEC_ava_available_P_technical_reasons", "WEC_ava_Available_P_force_majeure_reasons"),
    ("Diff_P_technical_P_external", "WEC_ava_available_P_technical_reasons", "WEC_ava_Available_P_force_external_reasons"),
    ("Diff_P_majeure_P_external", "WEC_ava_Available_P_force_majeure_reasons", "WEC_ava_Available_P_force_external_reasons"),
    // Average power and each available power
    ("Diff_avg_Power_P_wind", "WEC_ava_Power", "WEC_ava_available_P_from_wind"),
    ("Diff_avg_Power_P_technical", "WEC_ava_Power", "WEC_ava_available_P_technical_reasons"),
    ("Diff_avg_Power_P_majeure", "WEC_ava_Power", "WEC_ava_Available_P_force_majeure_reasons"),
    ("Diff_avg_Power_P_external", "WEC_ava_Power", "WEC_ava_Available_P_force_external_reasons"),
    // Paired temperature sensors
    ("Diff_front_rear_bearing", "CS101__Front_bearing_temp", "CS101__Rear_bearing_temp"),
    ("Diff_cabinet_A_B_temp", "CS101__Pitch_cabinet_blade_A_temp", "CS101__Pitch_cabinet_blade_B_temp"),
    ("Diff_cabinet_A_C_temp", "CS101__Pitch_cabinet_blade_A_temp", "CS101__Pitch_cabinet_blade_C_temp"),
    ("Diff_cabinet_B_C_temp", "CS101__Pitch_cabinet_blade_B_temp", "CS101__Pitch_cabinet_blade_C_temp"),
    ("Diff_rotor_temps", "CS101__Rotor_temp_1", "CS101__Rotor_temp_2"),
    ("Diff_stator_temps", "CS101__Stator_temp_1", "CS101__Stator_temp_2"),
    ("Diff_nacelle_ambient_temps", "CS101__Nacelle_ambient_temp_1", "CS101__Nacelle_ambient_temp_2"),
    ("Diff_nacelle_cabinet_temp", "CS101__Nacelle_temp", "CS101__Nacelle_cabinet_temp"),
    // Ambient against component temperatures
    ("Diff_ambient_nacelle_temp", "CS101__Ambient_temp", "CS101__Nacelle_temp"),
    ("Diff_ambient_nacelle_cabinet_temp", "CS101__Ambient_temp", "CS101__Nacelle_cabinet_temp"),
    ("Diff_ambient_rectifier_temp", "CS101__Ambient_temp", "CS101__Rectifier_cabinet_temp"),
    ("Diff_ambient_main_carrier_temp", "CS101__Ambient_temp", "CS101__Main_carrier_temp"),
    ("Diff_ambient_yaw_inverter_cabinet_temp", "CS101__Ambient_temp", "CS101__Yaw_inverter_cabinet_temp"),
    ("Diff_ambient_fan_inverter_cabinet_temp", "CS101__Ambient_temp", "CS101__Fan_inverter_cabinet_temp"),
    ("Diff_ambient_tower_temp", "CS101__Ambient_temp", "CS101__Tower_temp"),
    ("Diff_ambient_control_cabinet_temp", "CS101__Ambient_temp", "CS101__Control_cabinet_temp"),
    ("Diff_ambient_transformer_temp", "CS101__Ambient_temp", "CS101__Transformer_temp"),
    // Nacelle against generator
    ("Diff_nacelle_stator_1_temp", "CS101__Nacelle_temp", "CS101__Stator_temp_1"),
    ("Diff_nacelle_stator_2_temp", "CS101__Nacelle_temp", "CS101__Stator_temp_2"),
    ("Diff_nacelle_rotor_1_temp", "CS101__Nacelle_temp", "CS101__Rotor_temp_1"),
    ("Diff_nacelle_rotor_2_temp", "CS101__Nacelle_temp", "CS101__Rotor_temp_2"),
];

/// The eleven inverter cabinet sensors that survive pruning
const INVERTER_SUMMARY_COLUMNS: &[&str] = &[
    "CS101__Sys_1_inverter_1_cabinet_temp",
    "CS101__Sys_1_inverter_2_cabinet_temp",
    "CS101__Sys_1_inverter_3_cabinet_temp",
    "CS101__Sys_1_inverter_4_cabinet_temp",
    "CS101__Sys_1_inverter_5_cabinet_temp",
    "CS101__Sys_1_inverter_6_cabinet_temp",
    "CS101__Sys_1_inverter_7_cabinet_temp",
    "CS101__Sys_2_inverter_1_cabinet_temp",
    "CS101__Sys_2_inverter_2_cabinet_temp",
    "CS101__Sys_2_inverter_3_cabinet_temp",
    "CS101__Sys_2_inverter_4_cabinet_temp",
];

/// Expert features for the Enercon CS101 turbine
pub fn enercon() -> FeatureCatalog {
    FeatureCatalog {
        groups: GROUPS
            .iter()
            .map(|(name, members)| FeatureGroup {
                name: name.to_string(),
                members: members
                    .iter()
                    .map(|(label, column)| GroupMember {
                        label: label.to_string(),
                        column: column.to_string(),
                    })
                    .collect(),
                deviations: true,
            })
            .collect(),
        differences: DIFFERENCES
            .iter()
            .map(|(name, minuend, subtrahend)| Difference {
                name: name.to_string(),
                minuend: minuend.to_string(),
                subtrahend: subtrahend.to_string(),
            })
            .collect(),
    }
}

/// Mean and spread across all reliable inverter cabinets
pub fn inverter_summary() -> RowSummary {
    RowSummary {
        mean_name: "Inverter_averages".to_string(),
        std_name: "Inverter_std_dev".to_string(),
        columns: INVERTER_SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    }
}
