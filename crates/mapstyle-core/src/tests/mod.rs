mod feature;
